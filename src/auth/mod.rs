//! Identity and the account-approval workflow
//!
//! Accounts move from pending (after `register`) to approved (after an
//! admin's `approve`) and may be deleted by `revoke`. Only approved accounts
//! can authenticate.

mod gate;
pub mod password;

pub use gate::{AuthGate, BOOTSTRAP_ADMIN_PASSWORD, BOOTSTRAP_ADMIN_USERNAME};
pub use password::{hash_password, verify_password};
