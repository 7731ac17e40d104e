//! Reports for the ledger
//!
//! Balances, category breakdowns, budget utilization and goal progress, plus
//! the dashboard summary built from them.

pub mod aggregator;
pub mod summary;

pub use aggregator::{BudgetUtilization, LedgerAggregator, Totals};
pub use summary::LedgerSummary;
