//! Task CLI commands

use clap::Subcommand;

use super::input::parse_date;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Priority, Session};
use crate::services::TaskService;
use crate::storage::Storage;

/// Task subcommands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// What needs doing
        name: String,
        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
        /// Due date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Mark a task done by its number in `task list`
    Done {
        /// Task number
        index: usize,
    },

    /// List tasks
    List {
        /// Include finished tasks
        #[arg(short, long)]
        all: bool,
    },

    /// Delete a task by its number in `task list`
    Delete {
        /// Task number
        index: usize,
    },
}

/// Handle a task command
pub fn handle_task_command(storage: &Storage, session: &Session, cmd: TaskCommands) -> LedgerResult<()> {
    let service = TaskService::new(storage, session);

    match cmd {
        TaskCommands::Add { name, priority, date } => {
            let priority = priority
                .parse::<Priority>()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;
            let (index, task) = service.add(&name, priority, parse_date(date.as_deref())?)?;
            println!("Added #{}: {}", index, task);
        }

        TaskCommands::Done { index } => {
            if service.complete(index)? {
                println!("Task #{} done.", index);
            } else {
                println!("Task #{} was already done.", index);
            }
        }

        TaskCommands::List { all } => {
            let tasks = service.list(all)?;
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for (index, task) in tasks {
                println!("{:>4}  {}", index, task);
            }
        }

        TaskCommands::Delete { index } => {
            let removed = service.delete(index)?;
            println!("Deleted #{}: {}", index, removed.name);
        }
    }

    Ok(())
}
