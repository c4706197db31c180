//! Submission planning: which endpoints a confirmed draft hits, with what body.
//!
//! Savings movements are dual-entry. A deposit bumps the goal and books an
//! expense; a withdrawal lowers the goal and books income.

use cashflow_core::draft::{DraftKind, TransactionDraft};
use cashflow_core::TransactionType;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::categories::{SAVINGS_CATEGORY, SAVINGS_SOURCE, canonical_category};
use crate::error::SubmitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Post,
    Put,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEntry {
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsUpdate {
    pub current_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    Income(IncomeEntry),
    Expense(ExpenseEntry),
    Savings(SavingsUpdate),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
}

impl ApiRequest {
    fn post(path: &str, body: RequestBody) -> Self {
        Self {
            method: Method::Post,
            path: path.to_string(),
            body,
        }
    }
}

/// The savings goal a deposit or withdrawal applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalSelection {
    pub id: String,
    /// Balance of the goal before this movement
    pub current_amount: Decimal,
}

/// What the user chose while confirming the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitChoices {
    /// Overrides any category already on the draft
    pub category: Option<String>,
    pub goal: Option<GoalSelection>,
}

impl SubmitChoices {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_goal(mut self, id: impl Into<String>, current_amount: Decimal) -> Self {
        self.goal = Some(GoalSelection {
            id: id.into(),
            current_amount,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPlan {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub requests: Vec<ApiRequest>,
}

impl SubmissionPlan {
    pub fn paths(&self) -> Vec<&str> {
        self.requests.iter().map(|r| r.path.as_str()).collect()
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, SubmitError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SubmitError::MissingAmount);
    }
    let amount = Decimal::from_str(&raw.replace(',', ""))
        .map_err(|_| SubmitError::InvalidAmount(raw.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(SubmitError::InvalidAmount(raw.to_string()));
    }
    Ok(amount)
}

fn description(draft: &TransactionDraft) -> Option<String> {
    if draft.transaction_id.is_empty() {
        None
    } else {
        Some(format!("M-PESA {}", draft.transaction_id))
    }
}

fn title_or_default(draft: &TransactionDraft) -> String {
    if draft.title.trim().is_empty() {
        "M-PESA transaction".to_string()
    } else {
        draft.title.clone()
    }
}

fn overflow(goal: &GoalSelection, amount: Decimal) -> SubmitError {
    SubmitError::BalanceOverflow {
        goal: goal.id.clone(),
        current: goal.current_amount,
        amount,
    }
}

fn goal_update(goal: &GoalSelection, current_amount: Decimal) -> ApiRequest {
    ApiRequest {
        method: Method::Put,
        path: format!("/savings/{}", goal.id),
        body: RequestBody::Savings(SavingsUpdate { current_amount }),
    }
}

/// Validate a confirmed draft and list the requests that record it.
pub fn plan_submission(draft: &TransactionDraft, choices: &SubmitChoices) -> Result<SubmissionPlan, SubmitError> {
    let amount = parse_amount(&draft.amount)?;
    let title = title_or_default(draft);
    let description = description(draft);

    let requests = match &draft.kind {
        DraftKind::Income => {
            let source = if draft.partner.trim().is_empty() {
                "M-PESA".to_string()
            } else {
                draft.partner.clone()
            };
            vec![ApiRequest::post(
                "/income",
                RequestBody::Income(IncomeEntry {
                    title,
                    amount,
                    date: draft.date,
                    source,
                    description,
                }),
            )]
        }

        DraftKind::Expense { category } => {
            let chosen = choices
                .category
                .as_deref()
                .or(category.as_deref())
                .filter(|c| !c.trim().is_empty())
                .ok_or(SubmitError::MissingCategory)?;
            let category = canonical_category(chosen)
                .ok_or_else(|| SubmitError::UnknownCategory(chosen.to_string()))?;
            vec![ApiRequest::post(
                "/expenses",
                RequestBody::Expense(ExpenseEntry {
                    title,
                    amount,
                    date: draft.date,
                    category: category.to_string(),
                    description,
                }),
            )]
        }

        DraftKind::Savings => {
            let goal = choices
                .goal
                .as_ref()
                .ok_or(SubmitError::MissingGoal(TransactionType::Savings))?;
            let balance = goal
                .current_amount
                .checked_add(amount)
                .ok_or_else(|| overflow(goal, amount))?;
            vec![
                goal_update(goal, balance),
                ApiRequest::post(
                    "/expenses",
                    RequestBody::Expense(ExpenseEntry {
                        title,
                        amount,
                        date: draft.date,
                        category: SAVINGS_CATEGORY.to_string(),
                        description,
                    }),
                ),
            ]
        }

        DraftKind::SavingsWithdrawal => {
            let goal = choices
                .goal
                .as_ref()
                .ok_or(SubmitError::MissingGoal(TransactionType::SavingsWithdrawal))?;
            if amount > goal.current_amount {
                return Err(SubmitError::InsufficientSavings {
                    goal: goal.id.clone(),
                    requested: amount,
                    available: goal.current_amount,
                });
            }
            let balance = goal
                .current_amount
                .checked_sub(amount)
                .ok_or_else(|| overflow(goal, amount))?;
            vec![
                goal_update(goal, balance),
                ApiRequest::post(
                    "/income",
                    RequestBody::Income(IncomeEntry {
                        title,
                        amount,
                        date: draft.date,
                        source: SAVINGS_SOURCE.to_string(),
                        description,
                    }),
                ),
            ]
        }
    };

    tracing::debug!(
        kind = %draft.transaction_type(),
        requests = requests.len(),
        "planned submission"
    );

    Ok(SubmissionPlan {
        transaction_type: draft.transaction_type(),
        requests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: DraftKind, amount: &str) -> TransactionDraft {
        let mut d = TransactionDraft::new(kind, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        d.amount = amount.to_string();
        d.partner = "JOHN DOE".to_string();
        d.title = "Received from JOHN DOE".to_string();
        d.transaction_id = "XYZ1234567".to_string();
        d
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_income_plan() {
        let plan = plan_submission(&draft(DraftKind::Income, "1500.00"), &SubmitChoices::default()).unwrap();
        assert_eq!(plan.paths(), vec!["/income"]);
        match &plan.requests[0].body {
            RequestBody::Income(e) => {
                assert_eq!(e.amount, dec("1500.00"));
                assert_eq!(e.source, "JOHN DOE");
                assert_eq!(e.description.as_deref(), Some("M-PESA XYZ1234567"));
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_expense_requires_category() {
        let d = draft(DraftKind::expense(), "200");
        assert_eq!(
            plan_submission(&d, &SubmitChoices::default()),
            Err(SubmitError::MissingCategory)
        );
        assert_eq!(
            plan_submission(&d, &SubmitChoices::default().with_category("  ")),
            Err(SubmitError::MissingCategory)
        );
        assert_eq!(
            plan_submission(&d, &SubmitChoices::default().with_category("Shoes")),
            Err(SubmitError::UnknownCategory("Shoes".to_string()))
        );

        let plan = plan_submission(&d, &SubmitChoices::default().with_category("food")).unwrap();
        assert_eq!(plan.paths(), vec!["/expenses"]);
        match &plan.requests[0].body {
            RequestBody::Expense(e) => assert_eq!(e.category, "Food"),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_expense_category_set_on_draft() {
        let mut d = draft(DraftKind::expense(), "200");
        d.set_category("Rent");
        let plan = plan_submission(&d, &SubmitChoices::default()).unwrap();
        assert_eq!(plan.transaction_type, TransactionType::Expense);
    }

    #[test]
    fn test_savings_deposit_is_dual_entry() {
        let d = draft(DraftKind::Savings, "5000.00");
        assert_eq!(
            plan_submission(&d, &SubmitChoices::default()),
            Err(SubmitError::MissingGoal(TransactionType::Savings))
        );

        let plan = plan_submission(&d, &SubmitChoices::default().with_goal("g1", dec("1000"))).unwrap();
        assert_eq!(plan.paths(), vec!["/savings/g1", "/expenses"]);
        assert_eq!(plan.requests[0].method, Method::Put);
        assert_eq!(
            plan.requests[0].body,
            RequestBody::Savings(SavingsUpdate { current_amount: dec("6000.00") })
        );
        match &plan.requests[1].body {
            RequestBody::Expense(e) => assert_eq!(e.category, "Savings"),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_withdrawal() {
        let d = draft(DraftKind::SavingsWithdrawal, "700");
        let plan = plan_submission(&d, &SubmitChoices::default().with_goal("g1", dec("1000"))).unwrap();
        assert_eq!(plan.paths(), vec!["/savings/g1", "/income"]);
        assert_eq!(
            plan.requests[0].body,
            RequestBody::Savings(SavingsUpdate { current_amount: dec("300") })
        );

        let err = plan_submission(&d, &SubmitChoices::default().with_goal("g1", dec("500"))).unwrap_err();
        assert!(matches!(err, SubmitError::InsufficientSavings { .. }));
    }

    #[test]
    fn test_goal_balance_overflow() {
        let d = draft(DraftKind::Savings, "79228162514264337593543950335");
        let err = plan_submission(&d, &SubmitChoices::default().with_goal("g", Decimal::MAX)).unwrap_err();
        assert_eq!(
            err,
            SubmitError::BalanceOverflow {
                goal: "g".to_string(),
                current: Decimal::MAX,
                amount: Decimal::MAX,
            }
        );

        // near the top but still representable
        let d = draft(DraftKind::Savings, "1");
        let plan = plan_submission(&d, &SubmitChoices::default().with_goal("g", Decimal::MAX - Decimal::ONE)).unwrap();
        assert_eq!(
            plan.requests[0].body,
            RequestBody::Savings(SavingsUpdate { current_amount: Decimal::MAX })
        );
    }

    #[test]
    fn test_amount_validation() {
        let choices = SubmitChoices::default();
        assert_eq!(
            plan_submission(&draft(DraftKind::Income, ""), &choices),
            Err(SubmitError::MissingAmount)
        );
        assert_eq!(
            plan_submission(&draft(DraftKind::Income, "abc"), &choices),
            Err(SubmitError::InvalidAmount("abc".to_string()))
        );
        assert_eq!(
            plan_submission(&draft(DraftKind::Income, "0"), &choices),
            Err(SubmitError::InvalidAmount("0".to_string()))
        );
        // user-edited amount with separators is accepted
        assert!(plan_submission(&draft(DraftKind::Income, "1,200"), &choices).is_ok());
    }

    #[test]
    fn test_json_body() {
        let plan = plan_submission(
            &draft(DraftKind::Savings, "5000.00"),
            &SubmitChoices::default().with_goal("g1", dec("0")),
        )
        .unwrap();
        let v = serde_json::to_value(&plan).unwrap();
        assert_eq!(v["type"], "savings");
        assert_eq!(v["requests"][0]["method"], "PUT");
        assert_eq!(v["requests"][0]["body"]["currentAmount"], "5000.00");
        assert_eq!(v["requests"][1]["body"]["date"], "2025-01-01");
    }
}
