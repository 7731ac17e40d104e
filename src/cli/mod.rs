//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod admin;
pub mod budget;
pub mod category;
pub mod goal;
pub mod input;
pub mod task;
pub mod transaction;

pub use account::{handle_passwd, handle_register, handle_whoami, Credentials};
pub use admin::{handle_admin_command, AdminCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use task::{handle_task_command, TaskCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
