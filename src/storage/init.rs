//! Storage initialization
//!
//! Creates every table that is missing and bootstraps the admin account.
//! Both steps are idempotent, so re-running initialization repairs a data
//! directory left half-initialized by a crash.

use tracing::info;

use super::{Record, Storage};
use crate::auth::AuthGate;
use crate::error::LedgerError;
use crate::models::{Budget, CustomCategory, Goal, Task, Transaction, User};

/// What an initialization run changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Tables whose files were created by this run
    pub created_tables: Vec<&'static str>,
    /// Whether the bootstrap admin was created by this run
    pub admin_created: bool,
}

/// Ensure every table exists, then make sure an admin exists
pub fn initialize_storage(storage: &Storage) -> Result<InitReport, LedgerError> {
    storage.paths().ensure_directories()?;

    let mut report = InitReport::default();
    let tables = &storage.tables;

    let created = [
        (User::TABLE, tables.ensure::<User>()?),
        (Transaction::TABLE, tables.ensure::<Transaction>()?),
        (Budget::TABLE, tables.ensure::<Budget>()?),
        (Goal::TABLE, tables.ensure::<Goal>()?),
        (Task::TABLE, tables.ensure::<Task>()?),
        (CustomCategory::TABLE, tables.ensure::<CustomCategory>()?),
    ];
    report.created_tables = created
        .iter()
        .filter(|(_, was_created)| *was_created)
        .map(|(name, _)| *name)
        .collect();

    report.admin_created = AuthGate::new(storage).bootstrap_admin()?;

    if !report.created_tables.is_empty() {
        info!(tables = ?report.created_tables, "initialized tables");
    }

    Ok(report)
}
