//! M-PESA confirmation SMS -> transaction draft.
//!
//! The parser never fails. Sub-patterns that do not match fall back to
//! placeholders (empty amount/time/id, rule-specific partner, today's date)
//! and the caller validates before submitting anything.

use cashflow_core::draft::{DraftKind, TransactionDraft};
use cashflow_core::time::{Clock, SystemClock, local_today};
use chrono_tz::Tz;

use crate::parsers::fields::{extract_amount, extract_date, extract_time, extract_transaction_id};
use crate::parsers::rules::{Rule, SavingsProvider, classify, default_rules};
use crate::types::UnrecognizedPolicy;

#[derive(Debug, Clone)]
pub struct MpesaParser<C: Clock = SystemClock> {
    clock: C,
    timezone: Tz,
    rules: Vec<Rule>,
    savings: SavingsProvider,
    policy: UnrecognizedPolicy,
}

impl Default for MpesaParser<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl MpesaParser<SystemClock> {
    /// Wall clock, Africa/Nairobi, stock rules, lenient policy.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> MpesaParser<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            timezone: chrono_tz::Africa::Nairobi,
            rules: default_rules().to_vec(),
            savings: SavingsProvider::default(),
            policy: UnrecognizedPolicy::default(),
        }
    }

    pub fn timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    pub fn savings_provider(mut self, savings: SavingsProvider) -> Self {
        self.savings = savings;
        self
    }

    pub fn policy(mut self, policy: UnrecognizedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append a rule after the stock ones.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Parse possibly-absent input. `None` and `""` give `None`.
    pub fn parse_opt(&self, message: Option<&str>) -> Option<TransactionDraft> {
        self.parse(message?)
    }

    /// Only empty input yields `None` under the lenient policy. Whitespace is
    /// still a message and becomes a placeholder income draft.
    pub fn parse(&self, message: &str) -> Option<TransactionDraft> {
        if message.is_empty() {
            return None;
        }

        let classification = classify(message, &self.rules, &self.savings);
        let amount = extract_amount(message);

        if self.policy == UnrecognizedPolicy::Reject && (classification.is_none() || amount.is_none()) {
            tracing::debug!("rejecting unrecognized M-PESA message");
            return None;
        }

        let date = extract_date(message).unwrap_or_else(|| local_today(&self.clock, self.timezone));

        let mut draft = TransactionDraft::new(DraftKind::Income, date);
        draft.transaction_id = extract_transaction_id(message).unwrap_or_default();
        draft.time = extract_time(message).unwrap_or_default();
        draft.amount = amount.unwrap_or_default();

        if let Some(c) = classification {
            draft.kind = c.kind;
            draft.partner = c.partner;
            draft.title = c.title;
        }

        tracing::debug!(
            kind = %draft.transaction_type(),
            amount = %draft.amount,
            transaction_id = %draft.transaction_id,
            "parsed M-PESA message"
        );
        Some(draft)
    }

    /// Parse a message known to come from the savings provider, turning
    /// inbound or deposit drafts into withdrawals.
    pub fn parse_from_savings_provider(&self, message: &str) -> Option<TransactionDraft> {
        self.parse(message).map(TransactionDraft::into_withdrawal)
    }
}

/// Parse with the default parser (wall clock in Africa/Nairobi).
pub fn parse_mpesa_message(message: &str) -> Option<TransactionDraft> {
    MpesaParser::new().parse(message)
}
