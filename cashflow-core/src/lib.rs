//! cashflow-core: transaction draft types and clock utilities shared by the
//! M-PESA ingestion crates.

pub mod draft;
pub mod time;

pub use draft::{
    DraftKind, PaymentMethod, SAVINGS_DEPOSIT_TITLE, SAVINGS_WITHDRAWAL_TITLE, TransactionDraft,
    TransactionType,
};
pub use time::{Clock, FixedClock, SystemClock, DEFAULT_TIMEZONE, local_today, parse_timezone};
