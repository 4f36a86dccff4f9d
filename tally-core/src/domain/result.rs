//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
///
/// A cancelled file selection is not represented here: it is a normal
/// outcome of the picker, see [`crate::ports::PickOutcome`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("File selection failed: {0}")]
    Picker(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a picker error
    pub fn picker(msg: impl Into<String>) -> Self {
        Self::Picker(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a server error
    pub fn server(status: u16, msg: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: msg.into(),
        }
    }

    /// Short machine-readable kind, used as the log event context
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Picker(_) => "picker",
            Error::Network(_) => "network",
            Error::Server { .. } => "server",
            Error::Cancelled => "cancelled",
            Error::Config(_) => "config",
            Error::Other(_) => "other",
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for `--json` output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Create a failed result with context
    pub fn fail_with_context(
        error: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: Some(context),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}
