//! Upload response and outcome types

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Shown when the backend confirms an upload without a message
pub const DEFAULT_SUCCESS_MESSAGE: &str = "File uploaded successfully!";

/// Body returned by the upload endpoint
///
/// Current backends answer `{"message": "..."}`. Older ones echo the parsed
/// rows (`{"rows": [...]}`) or report a parse failure in a 200 response
/// (`{"error": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub rows: Option<Vec<JsonValue>>,
}

impl UploadResponse {
    /// Message to show the user on success
    pub fn success_message(&self) -> String {
        match (&self.message, &self.rows) {
            (Some(message), _) if !message.trim().is_empty() => message.clone(),
            (_, Some(rows)) => format!("{} records uploaded successfully", rows.len()),
            _ => DEFAULT_SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Terminal state of one pick-and-upload action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// Selection dismissed or request abandoned; nothing was shown
    Cancelled,
    Uploaded { file_name: String, message: String },
    Failed { user_message: String },
}
