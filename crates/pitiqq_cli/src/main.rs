//! Command-line probe over `pitiqq_core`.
//!
//! # Responsibility
//! - Verify core linkage (`ping`).
//! - Move backups in and out of a workspace database.
//! - Print the monthly ledger summary for quick local checks.

use chrono::Utc;
use clap::{Parser, Subcommand};
use pitiqq_core::view::finance::{budget_overview, monthly_summary};
use pitiqq_core::{
    backup_file_name, default_log_level, export_snapshot, import_snapshot, init_logging, open_db,
    Clock, SqliteStorage, Store, Workspace,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "pitiqq")]
#[command(version, about = "Personal finance, content and planning workspace")]
#[command(propagate_version = true)]
struct Cli {
    /// Workspace database file
    #[arg(long, global = true, env = "PITIQQ_DB", default_value = "pitiqq.db")]
    db: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PITIQQ_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "PITIQQ_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the core library is linked
    Ping,

    /// Write a backup of the whole workspace
    Export {
        /// Output file (defaults to pitiqq-backup-YYYY-MM-DD.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write compact JSON instead of indented
        #[arg(long)]
        compact: bool,
    },

    /// Restore a backup, replacing the collections it contains
    Import {
        /// Backup file to read
        file: PathBuf,
    },

    /// Print the ledger summary of one month
    Summary {
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if let Commands::Ping = cli.command {
        println!("pitiqq_core ping={}", pitiqq_core::ping());
        println!("pitiqq_core version={}", pitiqq_core::core_version());
        return Ok(());
    }

    let store = Store::new(SqliteStorage::new(open_db(&cli.db)?));
    let mut workspace = Workspace::open(&store)?;

    match &cli.command {
        Commands::Ping => {}
        Commands::Export { output, compact } => {
            let snapshot = export_snapshot(&workspace);
            let path = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(backup_file_name(Utc::now().date_naive())));
            std::fs::write(&path, snapshot.to_json(!compact)?)?;
            println!(
                "exported {} records to {}",
                snapshot.record_count(),
                path.display()
            );
        }
        Commands::Import { file } => {
            let json = std::fs::read_to_string(file)?;
            let report = import_snapshot(&mut workspace, &json)?;
            println!(
                "imported {} records across {} keys",
                report.records,
                report.imported.len()
            );
            if !report.ignored.is_empty() {
                println!("ignored keys: {}", report.ignored.join(", "));
            }
        }
        Commands::Summary { month } => {
            let month = month
                .clone()
                .unwrap_or_else(|| workspace.clock().current_month());
            let summary = monthly_summary(workspace.movements.items(), &month);
            println!("month={}", summary.month);
            println!("income={:.2}", summary.income);
            println!("expense={:.2}", summary.expense);
            println!("balance={:.2}", summary.balance);
            for total in &summary.expense_by_category {
                println!("  {:<20} {:>12.2}", total.category.label, total.amount);
            }

            let overview = budget_overview(
                workspace.budgets.items(),
                workspace.movements.items(),
                &month,
            );
            if !overview.lines.is_empty() {
                println!(
                    "budget used={}% remaining={:.2} alert={:?}",
                    overview.percentage, overview.remaining, overview.alert
                );
            }
        }
    }
    Ok(())
}
