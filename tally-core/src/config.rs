//! Configuration management
//!
//! Settings live in `settings.json` inside the tally directory:
//! ```json
//! {
//!   "apiBaseUrl": "http://localhost:8000",
//!   "uploadPath": "/upload-csv/",
//!   "timeoutSecs": 30,
//!   "errorMessages": "generic"
//! }
//! ```
//! Keys the CLI does not manage are preserved when saving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::services::ErrorMessagePolicy;

/// Default backend address (local development server)
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Upload route declared by the backend
pub const DEFAULT_UPLOAD_PATH: &str = "/upload-csv/";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "TALLY_API_URL";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upload_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_messages: Option<ErrorMessagePolicy>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Tally configuration
///
/// `api_base_url` is the effective address. When it comes from
/// `TALLY_API_URL`, saving leaves the stored address untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub api_base_url: String,
    pub upload_path: String,
    pub timeout_secs: u64,
    pub error_messages: ErrorMessagePolicy,
    #[serde(skip)]
    pub(crate) api_url_overridden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            error_messages: ErrorMessagePolicy::default(),
            api_url_overridden: false,
        }
    }
}

impl Config {
    /// Load config from the tally directory
    ///
    /// The base URL can be overridden with `TALLY_API_URL`.
    pub fn load(tally_dir: &Path) -> Result<Self> {
        let env_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self::from_settings(read_settings(tally_dir)?, env_url)
    }

    fn from_settings(raw: SettingsFile, env_url: Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let api_base_url = match &env_url {
            Some(url) => normalize_base_url(url)?,
            None => normalize_base_url(raw.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL))?,
        };
        // A zero timeout would fail every request before it is sent
        let timeout_secs = raw
            .timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.timeout_secs);

        Ok(Self {
            api_base_url,
            upload_path: normalize_path(&raw.upload_path.unwrap_or(defaults.upload_path)),
            timeout_secs,
            error_messages: raw.error_messages.unwrap_or(defaults.error_messages),
            api_url_overridden: env_url.is_some(),
        })
    }

    /// Save config to the tally directory
    pub fn save(&self, tally_dir: &Path) -> Result<()> {
        let mut settings = read_settings(tally_dir)?;

        if !self.api_url_overridden {
            settings.api_base_url = Some(self.api_base_url.clone());
        }
        settings.upload_path = Some(self.upload_path.clone());
        settings.timeout_secs = Some(self.timeout_secs);
        settings.error_messages = Some(self.error_messages);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(settings_path(tally_dir), content)
            .with_context(|| format!("Failed to write settings in {:?}", tally_dir))?;
        Ok(())
    }

    /// Set the backend base URL after validating it
    pub fn set_api_base_url(&mut self, url: &str) -> Result<()> {
        self.api_base_url = normalize_base_url(url)?;
        self.api_url_overridden = false;
        Ok(())
    }

    /// Set the request timeout; zero is rejected
    pub fn set_timeout_secs(&mut self, secs: u64) -> Result<()> {
        if secs == 0 {
            anyhow::bail!("Timeout must be at least one second");
        }
        self.timeout_secs = secs;
        Ok(())
    }

    /// Set the upload route
    pub fn set_upload_path(&mut self, path: &str) {
        self.upload_path = normalize_path(path);
    }

    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Directory where picked files are copied before upload
    pub fn cache_dir(tally_dir: &Path) -> PathBuf {
        tally_dir.join("cache").join("uploads")
    }
}

fn settings_path(tally_dir: &Path) -> PathBuf {
    tally_dir.join("settings.json")
}

fn read_settings(tally_dir: &Path) -> Result<SettingsFile> {
    let path = settings_path(tally_dir);
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

/// Validate an http(s) URL and strip the trailing slash
fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    let parsed = Url::parse(trimmed).context("Invalid API base URL")?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("API base URL must use http or https");
    }
    if parsed.host_str().is_none() {
        anyhow::bail!("API base URL must include a host");
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
