//! Error-to-user-message mapping
//!
//! Every screen turns failures into text through this one mapping, so the
//! upload entry points and the summary screen always agree. Full detail goes
//! to the event log, never only to the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::result::Error;

/// Title of the alert shown after a successful upload
pub const UPLOAD_SUCCESS_TITLE: &str = "Success";

/// Title of the alert shown after a failed upload
pub const UPLOAD_FAILED_TITLE: &str = "Upload Failed";

pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload file. Please try again.";
pub const SUMMARY_FAILED_MESSAGE: &str = "Failed to load summary. Please try again.";
pub const INSIGHTS_FAILED_MESSAGE: &str = "Failed to load insights. Please try again.";

/// What the user was doing when the error happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Upload,
    LoadSummary,
    LoadInsights,
}

impl UserAction {
    fn generic_message(&self) -> &'static str {
        match self {
            UserAction::Upload => UPLOAD_FAILED_MESSAGE,
            UserAction::LoadSummary => SUMMARY_FAILED_MESSAGE,
            UserAction::LoadInsights => INSIGHTS_FAILED_MESSAGE,
        }
    }
}

/// How much of an error the user gets to see
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMessagePolicy {
    /// A fixed, user-safe sentence per action
    #[default]
    Generic,
    /// The underlying error text
    Detailed,
}

impl ErrorMessagePolicy {
    pub fn user_message(&self, action: UserAction, error: &Error) -> String {
        match self {
            ErrorMessagePolicy::Generic => action.generic_message().to_string(),
            ErrorMessagePolicy::Detailed => error.to_string(),
        }
    }
}

impl fmt::Display for ErrorMessagePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessagePolicy::Generic => write!(f, "generic"),
            ErrorMessagePolicy::Detailed => write!(f, "detailed"),
        }
    }
}

impl FromStr for ErrorMessagePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(ErrorMessagePolicy::Generic),
            "detailed" => Ok(ErrorMessagePolicy::Detailed),
            other => Err(Error::Config(format!(
                "Unknown error message policy '{}'. Available: generic, detailed",
                other
            ))),
        }
    }
}
