//! Service layer for the ledger
//!
//! Services sit between the CLI and storage. Each one is bound to an
//! authenticated [`Session`](crate::models::Session) and scopes every read
//! and write to that user, validates input at the boundary and records
//! changes in the audit log.

pub mod budget;
pub mod categorizer;
pub mod category;
pub mod goal;
pub mod task;
pub mod transaction;

pub use budget::BudgetService;
pub use category::CategoryService;
pub use goal::GoalService;
pub use task::TaskService;
pub use transaction::{TransactionFilter, TransactionService};
