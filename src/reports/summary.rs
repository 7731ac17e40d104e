//! Dashboard summary
//!
//! Everything a user sees on their overview: totals, where the money went,
//! budget usage, goal progress and open tasks.

use std::collections::BTreeMap;

use super::aggregator::{budget_utilization, category_breakdown, totals, BudgetUtilization, Totals};
use crate::error::LedgerResult;
use crate::models::{Budget, Goal, Money, Task, Transaction, TransactionKind};
use crate::storage::Storage;

const BAR_WIDTH: usize = 20;

/// Snapshot of one user's ledger
#[derive(Debug, Clone)]
pub struct LedgerSummary {
    pub username: String,
    pub totals: Totals,
    /// Expense amount per category
    pub expenses_by_category: BTreeMap<String, Money>,
    pub budgets: Vec<BudgetUtilization>,
    pub goals: Vec<Goal>,
    pub pending_tasks: Vec<Task>,
    /// Utilization above which a budget is flagged
    pub alert_threshold: f64,
}

impl LedgerSummary {
    /// Build the summary for a user
    pub fn generate(storage: &Storage, username: &str, alert_threshold: f64) -> LedgerResult<Self> {
        let transactions = storage.tables.filter::<Transaction>(username)?;
        let budgets = storage.tables.filter::<Budget>(username)?;

        Ok(Self {
            username: username.to_string(),
            totals: totals(&transactions),
            expenses_by_category: category_breakdown(&transactions, TransactionKind::Expense),
            budgets: budget_utilization(&transactions, &budgets),
            goals: storage.tables.filter::<Goal>(username)?,
            pending_tasks: storage
                .tables
                .filter::<Task>(username)?
                .into_iter()
                .filter(|t| !t.is_done())
                .collect(),
            alert_threshold,
        })
    }

    /// Budgets above the alert threshold
    pub fn alerts(&self) -> Vec<&BudgetUtilization> {
        self.budgets
            .iter()
            .filter(|u| u.exceeds(self.alert_threshold))
            .collect()
    }

    /// Format the summary for terminal output
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Summary for {}\n", self.username));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Income:   {:>20}\n",
            self.totals.income.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "Expense:  {:>20}\n",
            self.totals.expense.format_with_symbol(symbol)
        ));
        output.push_str(&"-".repeat(31));
        output.push('\n');
        output.push_str(&format!(
            "Balance:  {:>20}\n",
            self.totals.net().format_with_symbol(symbol)
        ));

        if !self.expenses_by_category.is_empty() {
            output.push_str("\nSpending by category\n");
            for (category, amount) in &self.expenses_by_category {
                let share = amount.ratio(self.totals.expense).unwrap_or(0.0);
                output.push_str(&format!(
                    "  {:<20} {:>16} {:>5.1}%\n",
                    category,
                    amount.format_with_symbol(symbol),
                    share * 100.0
                ));
            }
        }

        if !self.budgets.is_empty() {
            output.push_str("\nBudgets\n");
            for budget in &self.budgets {
                let flag = if budget.exceeds(self.alert_threshold) { "!" } else { " " };
                output.push_str(&format!(
                    "{} {:<20} {} / {} ({})\n",
                    flag,
                    budget.category,
                    budget.spent.format_with_symbol(symbol),
                    budget.limit.format_with_symbol(symbol),
                    budget.percent_label()
                ));
            }
        }

        if !self.goals.is_empty() {
            output.push_str("\nGoals\n");
            for goal in &self.goals {
                output.push_str(&format!(
                    "  {:<20} {} {:>3.0}%\n",
                    goal.name,
                    progress_bar(goal.display_progress()),
                    goal.display_progress() * 100.0
                ));
            }
        }

        if !self.pending_tasks.is_empty() {
            output.push_str(&format!("\nOpen tasks ({})\n", self.pending_tasks.len()));
            for task in &self.pending_tasks {
                output.push_str(&format!("  {}\n", task));
            }
        }

        output
    }
}

/// `[#####-----]` style bar for a fraction in [0, 1]
pub fn progress_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
