//! Expense categories offered by the entry forms.

/// The choices a user picks from when confirming an M-PESA expense.
pub const EXPENSE_CATEGORIES: [&str; 6] = ["Food", "Transport", "Rent", "Utilities", "Entertainment", "Other"];

/// Category of the expense half of a savings deposit.
pub const SAVINGS_CATEGORY: &str = "Savings";

/// Income source recorded when money comes back out of savings.
pub const SAVINGS_SOURCE: &str = "Ziidi";

/// Match a user-typed category against the known list, ignoring case.
pub fn canonical_category(input: &str) -> Option<&'static str> {
    let input = input.trim();
    EXPENSE_CATEGORIES
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(input))
}
