use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use ledger::cli::{
    handle_admin_command, handle_budget_command, handle_category_command, handle_goal_command,
    handle_passwd, handle_register, handle_task_command, handle_transaction_command, handle_whoami,
    AdminCommands, BudgetCommands, CategoryCommands, Credentials, GoalCommands, TaskCommands,
    TransactionCommands,
};
use ledger::config::{paths::LedgerPaths, settings::Settings};
use ledger::error::LedgerError;
use ledger::models::{Budget, CustomCategory, Goal, Task, Transaction, User};
use ledger::reports::LedgerSummary;
use ledger::storage::{initialize_storage, Record, Storage};

#[derive(Parser)]
#[command(
    name = "ledger",
    version,
    about = "Multi-user personal ledger",
    long_about = "Record income and expenses, set budgets, save towards goals and \
                  keep a to-do list. New accounts need an administrator's approval \
                  before they can log in."
)]
struct Cli {
    /// Account to act as
    #[arg(short, long, global = true, env = "LEDGER_USER")]
    user: Option<String>,

    /// Password for --user (prompted for when omitted)
    #[arg(long, global = true, env = "LEDGER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, tables and admin account
    Init,

    /// Show current configuration and paths
    Config,

    /// Register a new account (needs admin approval)
    Register {
        /// Username for the new account
        username: String,
    },

    #[command(flatten)]
    Session(SessionCommands),
}

/// Commands that need a logged-in account
#[derive(Subcommand)]
enum SessionCommands {
    /// Show the logged-in account
    Whoami,

    /// Change a password
    Passwd {
        /// Account to change (admins only; defaults to yourself)
        target: Option<String>,

        /// New password (prompted for when omitted)
        #[arg(long, env = "LEDGER_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
    },

    /// Account approval and user management
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Task list commands
    #[command(subcommand)]
    Task(TaskCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Show balance, spending, budgets, goals and open tasks
    Summary,

    /// Show recent audit log entries (admin only)
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<LedgerError>() {
                Some(err) => {
                    if err.is_storage_unavailable() {
                        error!(error = %err, "storage failure");
                    }
                    eprintln!("Error: {}", err.user_message());
                }
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LEDGER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("ledger=info"));
    let json_logs = std::env::var("LEDGER_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let credentials = Credentials::new(cli.user, cli.password);

    let Some(command) = cli.command else {
        println!("ledger - multi-user personal ledger");
        println!();
        println!("Run 'ledger --help' for usage information.");
        println!("Run 'ledger init' to set up a new ledger.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            println!("Initializing ledger at: {}", paths.base_dir().display());
            let storage = Storage::new(paths.clone(), &settings)?;
            let report = initialize_storage(&storage)?;
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }

            if report.created_tables.is_empty() {
                println!("All tables already exist.");
            } else {
                println!("Created tables: {}", report.created_tables.join(", "));
            }
            if report.admin_created {
                println!();
                println!("Created the admin account 'admin' with the default password 'admin123'.");
                println!("Change it now: ledger --user admin passwd");
            }
            println!("Initialization complete!");
        }

        Commands::Config => {
            println!("Ledger Configuration");
            println!("====================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Tables:");
            for table in [
                User::TABLE,
                Transaction::TABLE,
                Budget::TABLE,
                Goal::TABLE,
                Task::TABLE,
                CustomCategory::TABLE,
            ] {
                println!("  {}", paths.table_file(table).display());
            }
            println!();
            println!("Settings:");
            println!("  Currency symbol:        {}", settings.currency_symbol);
            println!("  Date format:            {}", settings.date_format);
            println!("  Lock timeout:           {} ms", settings.lock_timeout_ms);
            println!("  Budget alert threshold: {}", settings.budget_alert_threshold);
        }

        Commands::Register { username } => {
            let storage = Storage::open(paths, &settings)?;
            handle_register(&storage, &credentials, &username)?;
        }

        Commands::Session(command) => {
            let storage = Storage::open(paths, &settings)?;
            let session = credentials.login(&storage)?;

            match command {
                SessionCommands::Whoami => handle_whoami(&session)?,
                SessionCommands::Passwd {
                    target,
                    new_password,
                } => handle_passwd(&storage, &session, target.as_deref(), new_password)?,
                SessionCommands::Admin(cmd) => handle_admin_command(&storage, &session, cmd)?,
                SessionCommands::Txn(cmd) => handle_transaction_command(&storage, &settings, &session, cmd)?,
                SessionCommands::Budget(cmd) => handle_budget_command(&storage, &settings, &session, cmd)?,
                SessionCommands::Goal(cmd) => handle_goal_command(&storage, &settings, &session, cmd)?,
                SessionCommands::Task(cmd) => handle_task_command(&storage, &session, cmd)?,
                SessionCommands::Category(cmd) => handle_category_command(&storage, &session, cmd)?,
                SessionCommands::Summary => {
                    let summary = LedgerSummary::generate(
                        &storage,
                        &session.username,
                        settings.budget_alert_threshold,
                    )?;
                    print!("{}", summary.format_terminal(&settings.currency_symbol));
                }
                SessionCommands::Audit { count } => {
                    if !session.is_admin() {
                        return Err(LedgerError::Forbidden(
                            "only an admin can read the audit log".into(),
                        )
                        .into());
                    }
                    let entries = storage.audit().read_recent(count)?;
                    if entries.is_empty() {
                        println!("Audit log is empty.");
                    }
                    for entry in entries {
                        println!("{}", entry.format_human_readable());
                    }
                }
            }
        }
    }

    Ok(())
}
