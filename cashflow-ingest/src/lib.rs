//! cashflow-ingest: M-PESA SMS parsing and the sender filter that feeds it.

pub mod types;
pub mod parsers;
pub mod listener;

pub use types::{SmsEvent, UnrecognizedPolicy};
pub use parsers::mpesa::{MpesaParser, parse_mpesa_message};
pub use parsers::rules::SavingsProvider;
pub use listener::{SmsListener, is_mpesa_sender};
