//! Goal CLI commands

use clap::Subcommand;

use super::input::parse_amount;
use crate::config::settings::Settings;
use crate::error::LedgerResult;
use crate::models::Session;
use crate::reports::summary::progress_bar;
use crate::services::GoalService;
use crate::storage::Storage;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
    },

    /// Put money towards a goal
    Deposit {
        /// Goal name
        name: String,
        /// Amount to deposit
        amount: String,
    },

    /// Show goals and their progress
    List,

    /// Delete a goal
    Delete {
        /// Goal name
        name: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    session: &Session,
    cmd: GoalCommands,
) -> LedgerResult<()> {
    let service = GoalService::new(storage, session);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::Add { name, target } => {
            let goal = service.add(&name, parse_amount(&target)?)?;
            println!(
                "Created goal '{}' with target {}",
                goal.name,
                goal.target.format_with_symbol(symbol)
            );
        }

        GoalCommands::Deposit { name, amount } => {
            let goal = service.deposit(&name, parse_amount(&amount)?)?;
            println!(
                "{}: {} of {} saved",
                goal.name,
                goal.current.format_with_symbol(symbol),
                goal.target.format_with_symbol(symbol)
            );
            if goal.is_reached() {
                println!("Goal reached!");
            }
        }

        GoalCommands::List => {
            let goals = service.list()?;
            if goals.is_empty() {
                println!("No goals yet. Use 'ledger goal add <name> <target>'.");
                return Ok(());
            }

            for goal in goals {
                println!(
                    "{:<20} {} {:>3.0}%  {} / {}",
                    goal.name,
                    progress_bar(goal.display_progress()),
                    goal.display_progress() * 100.0,
                    goal.current.format_with_symbol(symbol),
                    goal.target.format_with_symbol(symbol)
                );
            }
        }

        GoalCommands::Delete { name } => {
            let removed = service.delete(&name)?;
            println!("Deleted goal '{}'", removed.name);
        }
    }

    Ok(())
}
