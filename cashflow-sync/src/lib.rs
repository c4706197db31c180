//! cashflow-sync: turn confirmed M-PESA drafts into backend requests.
//!
//! Nothing here talks HTTP. A `SubmissionPlan` lists the requests the app
//! would send, in order, so any client can replay it.

pub mod categories;
pub mod error;
pub mod plan;

pub use categories::{EXPENSE_CATEGORIES, canonical_category};
pub use error::SubmitError;
pub use plan::{ApiRequest, GoalSelection, Method, RequestBody, SubmissionPlan, SubmitChoices, plan_submission};
