//! Storage layer for the ledger
//!
//! Provides CSV table storage with atomic writes, per-table locking and
//! automatic directory creation, plus the audit trail shared by every
//! mutation.

pub mod file_io;
pub mod init;
mod record;
mod table;

pub use init::{initialize_storage, InitReport};
pub use record::Record;
pub use table::TableStore;

use serde::Serialize;
use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::{paths::LedgerPaths, settings::Settings};
use crate::error::LedgerError;
use crate::models::{Budget, CustomCategory, Goal, Task, Transaction, User};

/// Main storage coordinator that provides access to the tables and audit log
pub struct Storage {
    paths: LedgerPaths,
    pub tables: TableStore,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LedgerPaths, settings: &Settings) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            tables: TableStore::new(paths.data_dir(), settings.lock_timeout()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Create the storage and make sure every table and the admin exist
    pub fn open(paths: LedgerPaths, settings: &Settings) -> Result<Self, LedgerError> {
        let storage = Self::new(paths, settings)?;
        initialize_storage(&storage)?;
        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Check if every table file exists
    pub fn is_initialized(&self) -> bool {
        [
            self.tables.path_of::<User>(),
            self.tables.path_of::<Transaction>(),
            self.tables.path_of::<Budget>(),
            self.tables.path_of::<Goal>(),
            self.tables.path_of::<Task>(),
            self.tables.path_of::<CustomCategory>(),
        ]
        .iter()
        .all(|path| path.exists())
    }

    /// Record a created row
    ///
    /// Audit calls come after the table write has committed, so a failed
    /// append is logged and swallowed rather than reported as a failed
    /// mutation.
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        key: impl Into<String>,
        actor: &str,
        row: &T,
    ) {
        self.record(AuditEntry::create(entity_type, key, actor, row));
    }

    /// Record an updated row
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        key: impl Into<String>,
        actor: &str,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) {
        let mut entry = AuditEntry::update(entity_type, key, actor, before, after);
        if let Some(summary) = summary {
            entry = entry.with_summary(summary);
        }
        self.record(entry);
    }

    /// Record a deleted row
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        key: impl Into<String>,
        actor: &str,
        row: &T,
    ) {
        self.record(AuditEntry::delete(entity_type, key, actor, row));
    }

    fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            warn!(
                error = %e,
                operation = %entry.operation,
                entity = %entry.entity_type,
                key = %entry.entity_key,
                "change committed but audit entry was not written"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, &Settings::default()).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_open_initializes_everything() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths, &Settings::default()).unwrap();

        assert!(storage.is_initialized());
        assert_eq!(storage.tables.load::<User>().unwrap().len(), 1);
    }

    #[test]
    fn test_audit_failure_does_not_fail_committed_write() {
        use crate::models::{Money, Role, Session, TransactionKind};
        use crate::services::TransactionService;
        use chrono::NaiveDate;

        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        // A directory where the audit file should be makes every append fail
        std::fs::create_dir_all(paths.audit_log()).unwrap();
        let storage = Storage::open(paths, &Settings::default()).unwrap();

        let kasun = Session {
            username: "kasun".into(),
            role: Role::User,
        };
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let (index, _) = TransactionService::new(&storage, &kasun)
            .add(date, "Food", "", Money::from_units(10), TransactionKind::Expense)
            .unwrap();

        assert_eq!(index, 0);
        assert_eq!(storage.tables.load::<Transaction>().unwrap().len(), 1);
    }
}
