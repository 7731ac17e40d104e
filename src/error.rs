//! Custom error types for the ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every failure is returned to the caller as
//! an explicit result; the presentation layer decides how to render it.

use thiserror::Error;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A table could not be read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A table file exists with unexpected columns
    #[error("Schema mismatch in table '{table}': expected [{expected}], found [{found}]")]
    SchemaMismatch {
        table: &'static str,
        expected: String,
        found: String,
    },

    /// Registration with a username that is already taken
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors (goals, custom categories)
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Username exists but the password does not match
    #[error("Wrong credential for user '{0}'")]
    WrongCredential(String),

    /// Credentials are valid but an admin has not approved the account yet
    #[error("Account '{0}' is pending approval")]
    PendingApproval(String),

    /// The acting role is not allowed to perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The reserved bootstrap account cannot be removed
    #[error("Account '{0}' is protected and cannot be deleted")]
    ProtectedAccount(String),

    /// Quick-entry text did not contain any digits
    #[error("No amount found in '{0}'")]
    NoAmountFound(String),

    /// A per-table lock could not be acquired in time
    #[error("Table '{table}' is busy, retry the operation")]
    ConflictRetry { table: &'static str },

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl LedgerError {
    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for a row addressed by its position in a view
    pub fn row_not_found(table: &'static str, index: usize) -> Self {
        Self::NotFound {
            entity_type: table,
            identifier: format!("#{}", index),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came out of the login flow
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::WrongCredential(_)
                | Self::PendingApproval(_)
                | Self::NotFound {
                    entity_type: "User",
                    ..
                }
        )
    }

    /// Check if the underlying data could not be reached
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable(_)
                | Self::SchemaMismatch { .. }
                | Self::ConflictRetry { .. }
                | Self::Io(_)
        )
    }

    /// Actionable text for the presentation layer
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound {
                entity_type: "User",
                identifier,
            } => format!("No account named '{}'. Register first.", identifier),
            Self::WrongCredential(_) => "Incorrect password. Please try again.".to_string(),
            Self::PendingApproval(_) => {
                "Your account is waiting for administrator approval.".to_string()
            }
            Self::ConflictRetry { .. } => {
                "Another change is in progress. Please retry in a moment.".to_string()
            }
            e if e.is_storage_unavailable() => "Data temporarily unavailable.".to_string(),
            e => e.to_string(),
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
