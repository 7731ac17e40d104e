//! Category CLI commands

use clap::Subcommand;

use crate::error::LedgerResult;
use crate::models::category::is_default_category;
use crate::models::Session;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Add a custom category
    Add {
        /// Category name
        name: String,
    },

    /// List built-in and custom categories
    List,

    /// Remove a custom category
    Remove {
        /// Category name
        name: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, session: &Session, cmd: CategoryCommands) -> LedgerResult<()> {
    let service = CategoryService::new(storage, session);

    match cmd {
        CategoryCommands::Add { name } => {
            let category = service.add(&name)?;
            println!("Added category '{}'", category.name);
        }
        CategoryCommands::List => {
            for name in service.list()? {
                let marker = if is_default_category(&name) { " " } else { "*" };
                println!("{} {}", marker, name);
            }
            println!();
            println!("* = custom category");
        }
        CategoryCommands::Remove { name } => {
            let removed = service.remove(&name)?;
            println!("Removed category '{}'", removed.name);
        }
    }

    Ok(())
}
