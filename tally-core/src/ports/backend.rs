//! Backend port - the remote insights service

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::result::Result;
use crate::domain::{
    CategoryTotal, DailySpending, SelectedFile, SummaryData, SummaryText, TransactionFilter,
    TransactionRecord, UploadResponse,
};

/// Remote service that stores uploaded CSVs and computes insights
///
/// Implementations map transport failures to [`crate::Error::Network`] and
/// non-2xx answers to [`crate::Error::Server`].
#[async_trait]
pub trait InsightsBackend: Send + Sync {
    /// POST the file as a multipart form with a single `file` part
    async fn upload_csv(&self, path: &str, file: &SelectedFile) -> Result<UploadResponse>;

    /// GET the income/expense/net summary
    async fn summary(&self) -> Result<SummaryData>;

    /// GET per-category totals
    async fn category_totals(&self) -> Result<Vec<CategoryTotal>>;

    /// GET per-day totals
    async fn daily_spending(&self) -> Result<Vec<DailySpending>>;

    /// GET the plain-language summary for an optional date range
    async fn summary_text(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<SummaryText>;

    /// GET uploaded transactions matching the filter
    async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<TransactionRecord>>;
}
