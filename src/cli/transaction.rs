//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management.

use clap::Subcommand;

use super::input::{parse_amount, parse_date};
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Session, Transaction, TransactionKind};
use crate::services::{TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Amount (e.g., "500" or "12.50")
        amount: String,
        /// Category name
        #[arg(short, long, default_value = "Other")]
        category: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },
    /// Add an expense from a note such as "bus 50"
    Quick {
        /// Free-text note containing the amount
        text: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List transactions
    List {
        /// Filter by category name
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Filter by type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Delete a transaction by its number in `txn list`
    Delete {
        /// Transaction number
        index: usize,
    },
    /// Show income, expense and balance
    Totals,
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    session: &Session,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    let service = TransactionService::new(storage, session);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            kind,
            date,
            description,
        } => {
            let (index, txn) = service.add(
                parse_date(date.as_deref())?,
                &category,
                &description,
                parse_amount(&amount)?,
                parse_kind(&kind)?,
            )?;
            println!("Added #{}: {}", index, format_row(&txn, settings));
        }

        TransactionCommands::Quick { text, date } => {
            let (index, txn) = service.add_quick(&text, parse_date(date.as_deref())?)?;
            println!(
                "Added #{}: {} {} in {}",
                index,
                txn.kind,
                txn.amount.format_with_symbol(symbol),
                txn.category
            );
        }

        TransactionCommands::List {
            category,
            kind,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }
            filter.start_date = from.as_deref().map(|d| parse_date(Some(d))).transpose()?;
            filter.end_date = to.as_deref().map(|d| parse_date(Some(d))).transpose()?;

            let rows = service.list(&filter)?;
            if rows.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }

            println!(
                "{:>4}  {:<10}  {:<16} {:<7} {:>14}  Description",
                "#", "Date", "Category", "Type", "Amount"
            );
            println!("{}", "-".repeat(72));
            for (index, txn) in rows {
                println!("{:>4}  {}", index, format_row(&txn, settings));
            }
        }

        TransactionCommands::Delete { index } => {
            let removed = service.delete(index)?;
            println!("Deleted #{}: {}", index, format_row(&removed, settings));
        }

        TransactionCommands::Totals => {
            let totals = service.totals()?;
            println!("Income:  {:>16}", totals.income.format_with_symbol(symbol));
            println!("Expense: {:>16}", totals.expense.format_with_symbol(symbol));
            println!("Balance: {:>16}", totals.net().format_with_symbol(symbol));
        }
    }

    Ok(())
}

fn parse_kind(input: &str) -> LedgerResult<TransactionKind> {
    input
        .parse::<TransactionKind>()
        .map_err(|e| LedgerError::Validation(e.to_string()))
}

fn format_row(txn: &Transaction, settings: &Settings) -> String {
    format!(
        "{:<10}  {:<16} {:<7} {:>14}  {}",
        txn.date.format(&settings.date_format),
        txn.category,
        txn.kind.to_string(),
        txn.amount.format_with_symbol(&settings.currency_symbol),
        txn.description
    )
}
