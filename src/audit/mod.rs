//! Append-only audit trail
//!
//! Every create, update and delete against a table is recorded as one JSON
//! line in `audit.log`, together with the acting user and the row before
//! and after the change. Password hashes never reach the log; user rows are
//! recorded through [`UserView`](entry::UserView).

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation, UserView};
pub use logger::AuditLogger;
