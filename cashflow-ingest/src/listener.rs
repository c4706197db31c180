//! Incoming-SMS handling: keep M-PESA messages, parse them, drop the rest.
//!
//! The phone's broadcast receiver hands over every SMS; only those whose
//! originating address is "MPESA" are worth parsing.

use cashflow_core::draft::TransactionDraft;
use cashflow_core::time::{Clock, SystemClock};

use crate::parsers::mpesa::MpesaParser;
use crate::types::SmsEvent;

pub const MPESA_SENDER: &str = "MPESA";

pub fn is_mpesa_sender(sender: &str) -> bool {
    sender.trim().eq_ignore_ascii_case(MPESA_SENDER)
}

#[derive(Debug, Clone)]
pub struct SmsListener<C: Clock = SystemClock> {
    parser: MpesaParser<C>,
}

impl Default for SmsListener<SystemClock> {
    fn default() -> Self {
        Self::new(MpesaParser::new())
    }
}

impl<C: Clock> SmsListener<C> {
    pub fn new(parser: MpesaParser<C>) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &MpesaParser<C> {
        &self.parser
    }

    /// Draft for one event, or `None` if it is not an M-PESA message or the
    /// parser had nothing to say about it.
    pub fn handle(&self, event: &SmsEvent) -> Option<TransactionDraft> {
        if !is_mpesa_sender(&event.sender) {
            tracing::debug!(sender = %event.sender, "ignoring SMS from non M-PESA sender");
            return None;
        }
        let draft = self.parser.parse(&event.body);
        if draft.is_none() {
            tracing::debug!("M-PESA message produced no draft");
        }
        draft
    }

    pub fn drain<'a, I>(&self, events: I) -> Vec<TransactionDraft>
    where
        I: IntoIterator<Item = &'a SmsEvent>,
    {
        events.into_iter().filter_map(|e| self.handle(e)).collect()
    }
}
