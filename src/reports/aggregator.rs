//! Derived figures over transactions, budgets and goals
//!
//! The free functions are pure over a snapshot of rows that already belong to
//! one user. [`LedgerAggregator`] loads that snapshot from storage and calls
//! them. Nothing computed here is ever persisted.

use std::collections::BTreeMap;

use crate::error::LedgerResult;
use crate::models::{Budget, Goal, Money, Transaction, TransactionKind};
use crate::storage::Storage;

/// Income and expense totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: Money,
    pub expense: Money,
}

impl Totals {
    /// Income minus expense
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// How much of one budget has been spent
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUtilization {
    pub category: String,
    pub spent: Money,
    pub limit: Money,
    /// `spent / limit`; `None` when the limit is zero
    pub ratio: Option<f64>,
}

impl BudgetUtilization {
    /// Whether spending is strictly above `threshold` of the limit
    ///
    /// A zero limit counts as exceeded as soon as anything is spent.
    pub fn exceeds(&self, threshold: f64) -> bool {
        match self.ratio {
            Some(ratio) => ratio > threshold,
            None => self.spent.is_positive(),
        }
    }

    /// Whether the whole limit is used up
    pub fn is_over(&self) -> bool {
        self.exceeds(1.0)
    }

    /// Ratio as a percentage for display, `--` when undefined
    pub fn percent_label(&self) -> String {
        match self.ratio {
            Some(ratio) => format!("{:.0}%", ratio * 100.0),
            None => "--".to_string(),
        }
    }
}

/// Sum income and expense separately
///
/// Sums saturate at the `i64` cent range instead of wrapping.
pub fn totals(transactions: &[Transaction]) -> Totals {
    transactions.iter().fold(Totals::default(), |mut acc, txn| {
        match txn.kind {
            TransactionKind::Income => acc.income += txn.amount,
            TransactionKind::Expense => acc.expense += txn.amount,
        }
        acc
    })
}

/// Income minus expense
pub fn balance(transactions: &[Transaction]) -> Money {
    totals(transactions).net()
}

/// Amount per category for one kind of transaction
///
/// Categories without a matching row are absent, not zero.
pub fn category_breakdown(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> BTreeMap<String, Money> {
    let mut breakdown = BTreeMap::new();
    for txn in transactions.iter().filter(|t| t.kind == kind) {
        *breakdown.entry(txn.category.clone()).or_insert_with(Money::zero) += txn.amount;
    }
    breakdown
}

/// Utilization of every budget, in budget order
pub fn budget_utilization(transactions: &[Transaction], budgets: &[Budget]) -> Vec<BudgetUtilization> {
    let spent_by_category = category_breakdown(transactions, TransactionKind::Expense);

    budgets
        .iter()
        .map(|budget| {
            let spent = spent_by_category
                .iter()
                .filter(|(category, _)| category.eq_ignore_ascii_case(&budget.category))
                .map(|(_, amount)| *amount)
                .sum();
            BudgetUtilization {
                category: budget.category.clone(),
                spent,
                limit: budget.limit,
                ratio: spent.ratio(budget.limit),
            }
        })
        .collect()
}

/// Budgets whose utilization is above `threshold`
pub fn budget_alerts(
    transactions: &[Transaction],
    budgets: &[Budget],
    threshold: f64,
) -> Vec<BudgetUtilization> {
    budget_utilization(transactions, budgets)
        .into_iter()
        .filter(|u| u.exceeds(threshold))
        .collect()
}

/// `current / target`, unclamped
pub fn goal_progress(goal: &Goal) -> f64 {
    goal.progress()
}

/// Per-user aggregates read straight from storage
pub struct LedgerAggregator<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerAggregator<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn balance(&self, username: &str) -> LedgerResult<Money> {
        Ok(balance(&self.transactions(username)?))
    }

    pub fn totals(&self, username: &str) -> LedgerResult<Totals> {
        Ok(totals(&self.transactions(username)?))
    }

    pub fn category_breakdown(
        &self,
        username: &str,
        kind: TransactionKind,
    ) -> LedgerResult<BTreeMap<String, Money>> {
        Ok(category_breakdown(&self.transactions(username)?, kind))
    }

    pub fn budget_utilization(&self, username: &str) -> LedgerResult<Vec<BudgetUtilization>> {
        let budgets = self.storage.tables.filter::<Budget>(username)?;
        Ok(budget_utilization(&self.transactions(username)?, &budgets))
    }

    pub fn budget_alert(&self, username: &str, threshold: f64) -> LedgerResult<Vec<BudgetUtilization>> {
        let budgets = self.storage.tables.filter::<Budget>(username)?;
        Ok(budget_alerts(&self.transactions(username)?, &budgets, threshold))
    }

    /// Every goal of the user with its unclamped progress
    pub fn goal_progress(&self, username: &str) -> LedgerResult<Vec<(Goal, f64)>> {
        Ok(self
            .storage
            .tables
            .filter::<Goal>(username)?
            .into_iter()
            .map(|goal| {
                let progress = goal_progress(&goal);
                (goal, progress)
            })
            .collect())
    }

    fn transactions(&self, username: &str) -> LedgerResult<Vec<Transaction>> {
        self.storage.tables.filter::<Transaction>(username)
    }
}
