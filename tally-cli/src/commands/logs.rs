//! Logs command - view and manage the event log

use anyhow::{anyhow, Context, Result};
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use tally_core::services::logging::now_ms;
use tally_core::{EntryPoint, LoggingService};

use super::get_tally_dir;
use crate::output;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear old log entries
    Clear {
        /// Delete logs older than N days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show log statistics and database path
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn get_logging_service() -> Result<LoggingService> {
    let tally_dir = get_tally_dir()?;
    std::fs::create_dir_all(&tally_dir)
        .with_context(|| format!("Failed to create tally directory: {:?}", tally_dir))?;
    Ok(LoggingService::new(
        &tally_dir,
        EntryPoint::Cli,
        env!("CARGO_PKG_VERSION"),
    )?)
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Timestamp `days` days before `now_ms`
fn cutoff_before(now_ms: i64, days: u64) -> Result<i64> {
    i64::try_from(days)
        .ok()
        .and_then(|days| days.checked_mul(DAY_MS))
        .and_then(|span| now_ms.checked_sub(span))
        .ok_or_else(|| anyhow!("--older-than-days {} is out of range", days))
}

pub fn run(command: LogsCommands) -> Result<()> {
    let service = get_logging_service()?;

    match command {
        LogsCommands::List { limit, errors, json } => {
            let entries = if errors {
                service.get_errors(limit)?
            } else {
                service.get_recent(limit)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if entries.is_empty() {
                println!("No log entries found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Event", "Screen", "Endpoint", "Error"]);

            for entry in entries {
                let screen = entry
                    .screen
                    .as_deref()
                    .or(entry.command.as_deref())
                    .unwrap_or_default()
                    .to_string();
                let error = match (&entry.error_kind, &entry.error_message) {
                    (Some(kind), _) => kind.red().to_string(),
                    (None, Some(_)) => "!".red().to_string(),
                    (None, None) => String::new(),
                };

                table.add_row(vec![
                    format_timestamp(entry.timestamp),
                    entry.event,
                    screen,
                    entry.endpoint.unwrap_or_default(),
                    error,
                ]);
            }

            println!("{}", table);

            if !errors {
                let recent_errors = service.get_errors(3)?;
                if !recent_errors.is_empty() {
                    println!();
                    println!("{}", "Recent Errors:".red().bold());
                    for err in &recent_errors {
                        println!(
                            "  {} [{}]: {}",
                            format_timestamp(err.timestamp).dimmed(),
                            err.event,
                            err.error_message.as_deref().unwrap_or("Unknown error")
                        );
                    }
                }
            }
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            let cutoff_ms = cutoff_before(now_ms(), older_than_days)?;

            if !force && !json {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete logs older than {} days?", older_than_days))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let deleted = service.delete_before(cutoff_ms)?;

            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                output::success(&format!("Deleted {} log entries", deleted));
            }
        }
        LogsCommands::Stats { json } => {
            let total = service.count()?;
            let errors = service.count_errors()?;
            let db_path = service.db_path().to_path_buf();
            let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "total_entries": total,
                        "error_count": errors,
                        "database_path": db_path.to_string_lossy(),
                        "database_size_bytes": size_bytes
                    })
                );
            } else {
                println!("{}", "Log Statistics".bold());
                println!("  Total entries: {}", total);
                println!("  Errors: {}", errors);
                println!("  Database: {}", db_path.display());
                println!("  Size: {}", output::format_size(size_bytes));
            }
        }
    }

    Ok(())
}
