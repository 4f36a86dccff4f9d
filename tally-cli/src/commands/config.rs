//! Config command - show and change settings.json

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use tally_core::config::{Config, API_URL_ENV};
use tally_core::services::ErrorMessagePolicy;

use super::get_tally_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one or more settings
    Set {
        /// Backend base URL, e.g. http://localhost:8000
        #[arg(long)]
        api_url: Option<String>,
        /// Upload route, e.g. /upload-csv/
        #[arg(long)]
        upload_path: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// How failures are worded: generic or detailed
        #[arg(long)]
        error_messages: Option<ErrorMessagePolicy>,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let tally_dir = get_tally_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&tally_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Setting", "Value"]);
            table.add_row(vec!["API base URL".to_string(), config.api_base_url.clone()]);
            table.add_row(vec!["Upload path".to_string(), config.upload_path.clone()]);
            table.add_row(vec!["Timeout".to_string(), format!("{}s", config.timeout_secs)]);
            table.add_row(vec!["Error messages".to_string(), config.error_messages.to_string()]);
            println!("{}", table);

            if std::env::var(API_URL_ENV).is_ok() {
                println!("{}", format!("API base URL overridden by {}", API_URL_ENV).dimmed());
            }
        }
        ConfigCommands::Set {
            api_url,
            upload_path,
            timeout_secs,
            error_messages,
        } => {
            if api_url.is_none()
                && upload_path.is_none()
                && timeout_secs.is_none()
                && error_messages.is_none()
            {
                bail!("Nothing to set. See `tally config set --help`.");
            }

            std::fs::create_dir_all(&tally_dir)?;
            let mut config = Config::load(&tally_dir)?;

            if let Some(url) = api_url {
                config.set_api_base_url(&url)?;
            }
            if let Some(path) = upload_path {
                config.set_upload_path(&path);
            }
            if let Some(secs) = timeout_secs {
                config.set_timeout_secs(secs)?;
            }
            if let Some(policy) = error_messages {
                config.error_messages = policy;
            }

            config.save(&tally_dir)?;
            output::success("Settings saved.");
        }
    }

    Ok(())
}
