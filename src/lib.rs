//! ledger - multi-user personal ledger
//!
//! Users record income and expenses, set per-category budgets, save towards
//! goals and keep a to-do list. New accounts must be approved by an admin
//! before they can log in.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: One record type per table
//! - `storage`: CSV table storage with atomic writes and per-table locks
//! - `auth`: Password hashing, registration and account approval
//! - `services`: Per-user operations, including quick-entry parsing
//! - `reports`: Balances, breakdowns, budget and goal progress
//! - `audit`: Audit logging system
//! - `cli`: Command handlers for the `ledger` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger::auth::AuthGate;
//! use ledger::config::{LedgerPaths, Settings};
//! use ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths, &settings)?;
//! let session = AuthGate::new(&storage).authenticate("kasun", "secret")?;
//! ```

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
