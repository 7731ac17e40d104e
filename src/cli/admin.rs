//! Admin CLI commands

use clap::Subcommand;

use crate::auth::AuthGate;
use crate::error::LedgerResult;
use crate::models::{Session, User};
use crate::storage::Storage;

/// Admin subcommands
#[derive(Subcommand)]
pub enum AdminCommands {
    /// List accounts awaiting approval
    Pending,

    /// List all accounts
    Users,

    /// Approve a pending account
    Approve {
        /// Username to approve
        username: String,
    },

    /// Delete an account
    Revoke {
        /// Username to delete
        username: String,
    },
}

/// Handle an admin command
pub fn handle_admin_command(storage: &Storage, session: &Session, cmd: AdminCommands) -> LedgerResult<()> {
    let gate = AuthGate::new(storage);

    match cmd {
        AdminCommands::Pending => {
            let pending = gate.list_pending(session.role)?;
            if pending.is_empty() {
                println!("No accounts awaiting approval.");
            } else {
                print_users(&pending);
            }
        }
        AdminCommands::Users => {
            print_users(&gate.list_users(session.role)?);
        }
        AdminCommands::Approve { username } => {
            if gate.approve(session, &username)? {
                println!("Approved '{}'.", username);
            } else {
                println!("'{}' was already approved.", username);
            }
        }
        AdminCommands::Revoke { username } => {
            gate.revoke(session, &username)?;
            println!("Deleted account '{}'.", username);
        }
    }

    Ok(())
}

fn print_users(users: &[User]) {
    println!("{:<24} {:<6} Status", "Username", "Role");
    println!("{}", "-".repeat(42));
    for user in users {
        let status = if user.approved { "approved" } else { "pending" };
        println!("{:<24} {:<6} {}", user.username, user.role.to_string(), status);
    }
}
