//! Transaction drafts produced from M-PESA messages.
//!
//! A draft is transient: it has no id, is never persisted, and is owned by
//! whichever form or listener asked for it until the user confirms or
//! discards it. Callers are free to edit fields before submission.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title given to deposits into the savings provider.
pub const SAVINGS_DEPOSIT_TITLE: &str = "Saved to Zidi";
/// Title given to withdrawals out of the savings provider.
pub const SAVINGS_WITHDRAWAL_TITLE: &str = "Withdrawn from Zidi";

/// Semantic classification of a draft, without payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionType {
    Income,
    Expense,
    Savings,
    SavingsWithdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Savings => "savings",
            TransactionType::SavingsWithdrawal => "savings-withdrawal",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific part of a draft. Only expenses carry a category, and the
/// parser always leaves it unset: the user has to pick one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DraftKind {
    Income,
    Expense {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
    },
    Savings,
    SavingsWithdrawal,
}

impl DraftKind {
    pub fn expense() -> Self {
        DraftKind::Expense { category: None }
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self {
            DraftKind::Income => TransactionType::Income,
            DraftKind::Expense { .. } => TransactionType::Expense,
            DraftKind::Savings => TransactionType::Savings,
            DraftKind::SavingsWithdrawal => TransactionType::SavingsWithdrawal,
        }
    }
}

/// Every draft is tagged as mobile-money sourced.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "M-PESA")]
    Mpesa,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    /// Decimal text with thousands separators removed; empty if none was found
    pub amount: String,
    /// Sender or recipient, best effort
    pub partner: String,
    pub title: String,
    pub date: NaiveDate,
    /// 24-hour "HH:MM", empty if the message had no time
    pub time: String,
    #[serde(flatten)]
    pub kind: DraftKind,
    pub payment_method: PaymentMethod,
    pub transaction_id: String,
}

impl TransactionDraft {
    pub fn new(kind: DraftKind, date: NaiveDate) -> Self {
        Self {
            amount: String::new(),
            partner: String::new(),
            title: String::new(),
            date,
            time: String::new(),
            kind,
            payment_method: PaymentMethod::Mpesa,
            transaction_id: String::new(),
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.kind.transaction_type()
    }

    pub fn has_amount(&self) -> bool {
        !self.amount.trim().is_empty()
    }

    pub fn category(&self) -> Option<&str> {
        match &self.kind {
            DraftKind::Expense { category } => category.as_deref(),
            _ => None,
        }
    }

    /// Record the user's category choice. Returns false (and changes nothing)
    /// when the draft is not an expense.
    pub fn set_category(&mut self, value: impl Into<String>) -> bool {
        match &mut self.kind {
            DraftKind::Expense { category } => {
                *category = Some(value.into());
                true
            }
            _ => false,
        }
    }

    /// Reinterpret a draft as money coming back out of the savings provider.
    ///
    /// Used by call sites that already know the message originated from the
    /// provider. Deposits and inbound (income) drafts flip to withdrawals;
    /// expenses and existing withdrawals are returned untouched.
    pub fn into_withdrawal(mut self) -> Self {
        match self.kind {
            DraftKind::Income | DraftKind::Savings => {
                self.kind = DraftKind::SavingsWithdrawal;
                self.title = SAVINGS_WITHDRAWAL_TITLE.to_string();
                self
            }
            DraftKind::Expense { .. } | DraftKind::SavingsWithdrawal => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_category_only_on_expenses() {
        let mut income = TransactionDraft::new(DraftKind::Income, date());
        assert!(!income.set_category("Food"));
        assert_eq!(income.category(), None);

        let mut expense = TransactionDraft::new(DraftKind::expense(), date());
        assert_eq!(expense.category(), None);
        assert!(expense.set_category("Food"));
        assert_eq!(expense.category(), Some("Food"));
    }

    #[test]
    fn test_into_withdrawal() {
        let mut deposit = TransactionDraft::new(DraftKind::Savings, date());
        deposit.amount = "500".to_string();
        deposit.title = SAVINGS_DEPOSIT_TITLE.to_string();

        let w = deposit.into_withdrawal();
        assert_eq!(w.transaction_type(), TransactionType::SavingsWithdrawal);
        assert_eq!(w.title, SAVINGS_WITHDRAWAL_TITLE);
        assert_eq!(w.amount, "500");

        let expense = TransactionDraft::new(DraftKind::expense(), date());
        assert_eq!(expense.clone().into_withdrawal(), expense);
    }

    #[test]
    fn test_json_shape() {
        let mut d = TransactionDraft::new(DraftKind::SavingsWithdrawal, date());
        d.amount = "1500.00".to_string();
        d.transaction_id = "XYZ1234567".to_string();

        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["type"], "savings-withdrawal");
        assert_eq!(v["paymentMethod"], "M-PESA");
        assert_eq!(v["transactionId"], "XYZ1234567");
        assert_eq!(v["date"], "2024-03-05");
        assert!(v.get("category").is_none());
    }

    #[test]
    fn test_expense_json_roundtrip_keeps_category() {
        let mut d = TransactionDraft::new(DraftKind::expense(), date());
        d.set_category("Transport");

        let s = serde_json::to_string(&d).unwrap();
        assert!(s.contains(r#""category":"Transport""#));
        let back: TransactionDraft = serde_json::from_str(&s).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(TransactionType::SavingsWithdrawal.to_string(), "savings-withdrawal");
        assert_eq!(DraftKind::expense().transaction_type().as_str(), "expense");
    }
}
