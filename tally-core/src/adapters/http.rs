//! Backend HTTP client
//!
//! Talks to the insights service over its REST routes. The client is built
//! once from [`Config`] and shared by every service.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::domain::result::{Error, Result};
use crate::domain::{
    CategoryTotal, DailySpending, SelectedFile, SummaryData, SummaryText, TransactionFilter,
    TransactionRecord, UploadResponse,
};
use crate::ports::InsightsBackend;

pub const SUMMARY_PATH: &str = "/insights/summary/";
pub const CATEGORY_TOTALS_PATH: &str = "/insights/category-totals/";
pub const DAILY_PATH: &str = "/insights/daily/";
pub const SUMMARY_TEXT_PATH: &str = "/insights/summary-text/";
pub const TRANSACTIONS_PATH: &str = "/transactions/";

/// Name of the multipart part carrying the CSV
pub const UPLOAD_FIELD: &str = "file";

/// Longest error body echoed into an error message
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for the insights backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.api_base_url))
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(map_request_error)?;

        let response = check_response_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| Error::network(format!("Failed to parse response from {}: {}", path, e)))
    }
}

#[async_trait]
impl InsightsBackend for ApiClient {
    async fn upload_csv(&self, path: &str, file: &SelectedFile) -> Result<UploadResponse> {
        let bytes = tokio::fs::read(&file.uri)
            .await
            .map_err(|e| Error::picker(format!("Cannot read {}: {}", file.uri.display(), e)))?;

        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(file.mime_type)
            .map_err(|e| Error::Other(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        // multipart() sets `Content-Type: multipart/form-data; boundary=...`
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(map_request_error)?;

        let response = check_response_status(response).await?;
        let status = response.status().as_u16();

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| Error::network(format!("Failed to parse upload response: {}", e)))?;

        if let Some(error) = &body.error {
            return Err(Error::server(status, error.clone()));
        }

        Ok(body)
    }

    async fn summary(&self) -> Result<SummaryData> {
        self.get_json(SUMMARY_PATH, &[]).await
    }

    async fn category_totals(&self) -> Result<Vec<CategoryTotal>> {
        self.get_json(CATEGORY_TOTALS_PATH, &[]).await
    }

    async fn daily_spending(&self) -> Result<Vec<DailySpending>> {
        self.get_json(DAILY_PATH, &[]).await
    }

    async fn summary_text(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<SummaryText> {
        let filter = TransactionFilter {
            start_date,
            end_date,
            category: None,
        };
        self.get_json(SUMMARY_TEXT_PATH, &filter.query_params()).await
    }

    async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<TransactionRecord>> {
        self.get_json(TRANSACTIONS_PATH, &filter.query_params()).await
    }
}

/// Map request errors to user-friendly messages
fn map_request_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::network("Request timed out")
    } else if error.is_connect() {
        Error::network("Unable to connect to the server")
    } else {
        Error::network(format!("Request failed: {}", error))
    }
}

/// Turn any non-2xx response into a server error carrying the body text
async fn check_response_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = extract_error_message(&text)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    Err(Error::server(status.as_u16(), message))
}

/// Pull a readable message out of an error body (`{"detail": ...}`,
/// `{"error": ...}` or plain text)
fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["detail", "error", "message"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) => return Some(s.clone()),
                Some(other) if !other.is_null() => return Some(other.to_string()),
                _ => {}
            }
        }
    }

    Some(trimmed.chars().take(MAX_ERROR_BODY).collect())
}
