//! Core data models for the ledger
//!
//! One struct per table (users, transactions, budget, goals, tasks,
//! categories) plus the `Money` amount type shared by all of them.

pub mod budget;
pub mod category;
pub mod goal;
pub mod money;
pub mod task;
pub mod transaction;
pub mod user;

pub use budget::Budget;
pub use category::{merge_categories, CustomCategory, DEFAULT_CATEGORIES, FALLBACK_CATEGORY};
pub use goal::Goal;
pub use money::Money;
pub use task::{Priority, Task, TaskStatus};
pub use transaction::{Transaction, TransactionKind};
pub use user::{Role, Session, User};
