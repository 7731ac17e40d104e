//! Budget CLI commands

use clap::Subcommand;

use super::input::parse_amount;
use crate::config::settings::Settings;
use crate::error::LedgerResult;
use crate::models::Session;
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the spending limit for a category
    Set {
        /// Category name
        category: String,
        /// Limit (e.g., "1000" or "1000.00")
        limit: String,
    },

    /// Show every budget with what has been spent against it
    List,

    /// Remove the limit for a category
    Remove {
        /// Category name
        category: String,
    },

    /// Show budgets that are nearly or fully used up
    Alerts {
        /// Fraction of the limit that triggers an alert (defaults to the configured threshold)
        #[arg(short, long)]
        threshold: Option<f64>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    session: &Session,
    cmd: BudgetCommands,
) -> LedgerResult<()> {
    let service = BudgetService::new(storage, session);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Set { category, limit } => {
            let limit = parse_amount(&limit)?;
            match service.set_limit(&category, limit)? {
                Some(previous) => println!(
                    "Budget for {} changed: {} -> {}",
                    category.trim(),
                    previous.limit.format_with_symbol(symbol),
                    limit.format_with_symbol(symbol)
                ),
                None => println!(
                    "Budget for {} set to {}",
                    category.trim(),
                    limit.format_with_symbol(symbol)
                ),
            }
        }

        BudgetCommands::List => {
            let rows = service.utilization()?;
            if rows.is_empty() {
                println!("No budgets set. Use 'ledger budget set <category> <limit>'.");
                return Ok(());
            }

            println!(
                "{:<20} {:>14} {:>14} {:>6}",
                "Category", "Spent", "Limit", "Used"
            );
            println!("{}", "-".repeat(57));
            for row in rows {
                println!(
                    "{:<20} {:>14} {:>14} {:>6}",
                    row.category,
                    row.spent.format_with_symbol(symbol),
                    row.limit.format_with_symbol(symbol),
                    row.percent_label()
                );
            }
        }

        BudgetCommands::Remove { category } => {
            let removed = service.remove(&category)?;
            println!("Removed budget for {}", removed.category);
        }

        BudgetCommands::Alerts { threshold } => {
            let threshold = threshold.unwrap_or(settings.budget_alert_threshold);
            let alerts = service.alerts(threshold)?;
            if alerts.is_empty() {
                println!("All budgets are below {:.0}% of their limit.", threshold * 100.0);
                return Ok(());
            }

            for alert in alerts {
                let label = if alert.is_over() { "OVER" } else { "WARN" };
                println!(
                    "{} {}: {} of {} ({})",
                    label,
                    alert.category,
                    alert.spent.format_with_symbol(symbol),
                    alert.limit.format_with_symbol(symbol),
                    alert.percent_label()
                );
            }
        }
    }

    Ok(())
}
