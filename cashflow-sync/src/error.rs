//! Reasons a draft cannot be submitted yet.

use cashflow_core::TransactionType;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The message had no "Ksh" amount and the user has not typed one
    #[error("draft has no amount")]
    MissingAmount,

    #[error("invalid amount '{0}': expected a positive number")]
    InvalidAmount(String),

    /// Expenses are never auto-categorized
    #[error("choose a category before saving this expense")]
    MissingCategory,

    #[error("unknown expense category '{0}'")]
    UnknownCategory(String),

    #[error("choose a savings goal for this {0} entry")]
    MissingGoal(TransactionType),

    #[error("goal {goal} balance {current} cannot absorb {amount}")]
    BalanceOverflow {
        goal: String,
        current: Decimal,
        amount: Decimal,
    },

    #[error("cannot withdraw {requested} from goal {goal}: only {available} saved")]
    InsufficientSavings {
        goal: String,
        requested: Decimal,
        available: Decimal,
    },
}
