//! Output formatting utilities

use std::time::Duration;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tally_core::ports::{Notification, NotificationKind, Notifier};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print a labeled failure, e.g. "Summary unavailable: ..."
pub fn labeled_error(label: &str, msg: &str) {
    eprintln!("{} {}", format!("{}:", label).red().bold(), msg);
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Spinner shown while waiting on the backend
///
/// Hidden when stdout is not a terminal or JSON output was requested.
pub fn spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled || atty::isnt(atty::Stream::Stdout) {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Shows upload alerts in the terminal
pub struct TerminalNotifier {
    quiet: bool,
}

impl TerminalNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        if self.quiet {
            return;
        }
        match notification.kind {
            NotificationKind::Success => {
                println!("{} {}", notification.title.green().bold(), notification.message);
            }
            NotificationKind::Failure => {
                labeled_error(&notification.title, &notification.message);
            }
        }
    }
}
