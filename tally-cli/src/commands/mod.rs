//! CLI command implementations

pub mod config;
pub mod insights;
pub mod logs;
pub mod summary;
pub mod upload;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tally_core::{EntryPoint, LoggingService, TallyContext};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::output::TerminalNotifier;

/// Marker error: the failure was already shown, only the exit code is left
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command failed")
    }
}

impl std::error::Error for Reported {}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<Arc<LoggingService>> {
    let tally_dir = get_tally_dir().ok()?;
    std::fs::create_dir_all(&tally_dir).ok()?;
    LoggingService::new(&tally_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Get the tally directory from environment or default
pub fn get_tally_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TALLY_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".tally"))
        .context("Could not find home directory; set TALLY_DIR")
}

/// Build the context for `command`, recording the invocation in the event log
pub fn get_context(command: &str, quiet: bool) -> Result<TallyContext> {
    let tally_dir = get_tally_dir()?;
    std::fs::create_dir_all(&tally_dir)
        .with_context(|| format!("Failed to create tally directory: {:?}", tally_dir))?;

    let logger = get_logger();
    if let Some(logger) = &logger {
        let _ = logger.log_command(command);
    }

    TallyContext::new(&tally_dir, Arc::new(TerminalNotifier::new(quiet)), logger)
        .context("Failed to initialize tally context")
}

pub fn runtime() -> Result<Runtime> {
    Runtime::new().context("Failed to start async runtime")
}

/// Cancel `lifetime` when the user presses Ctrl-C
///
/// Must be called from inside the runtime.
pub fn cancel_on_interrupt(lifetime: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            _ = lifetime.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    lifetime.cancel();
                }
            }
        }
    });
}
