//! Tally CLI - upload bank statements and read back financial insights

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, insights, logs, summary, upload, Reported};

/// Tally - send CSV statements to the backend and view the summary
#[derive(Parser)]
#[command(name = "tally", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a CSV statement
    Upload {
        /// Path to the CSV file (prompts when omitted)
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show total income, total expense and net
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show spending totals per category
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show spending per day
    Daily {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a plain-language summary for a date range
    Report {
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day of the range (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List uploaded transactions
    Transactions {
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day of the range (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// View or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        // Already shown to the user
        Err(e) if e.is::<Reported>() => ExitCode::FAILURE,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Upload { file, json } => upload::run(file, json),
        Commands::Summary { json } => summary::run(json),
        Commands::Categories { json } => insights::run_categories(json),
        Commands::Daily { json } => insights::run_daily(json),
        Commands::Report { start, end, json } => insights::run_report(start, end, json),
        Commands::Transactions {
            start,
            end,
            category,
            json,
        } => insights::run_transactions(start, end, category, json),
        Commands::Logs { command } => logs::run(command),
        Commands::Config { command } => config::run(command),
    }
}
