//! Insights service - read-only views beyond the summary

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use super::logging::{record, LogEvent, LoggingService};
use super::run_cancellable;
use crate::adapters::http::{CATEGORY_TOTALS_PATH, DAILY_PATH, SUMMARY_TEXT_PATH, TRANSACTIONS_PATH};
use crate::domain::result::{Error, Result};
use crate::domain::{CategoryTotal, DailySpending, SummaryText, TransactionFilter, TransactionRecord};
use crate::ports::InsightsBackend;

const SCREEN: &str = "insights";

pub struct InsightsService {
    backend: Arc<dyn InsightsBackend>,
    logger: Option<Arc<LoggingService>>,
}

impl InsightsService {
    pub fn new(backend: Arc<dyn InsightsBackend>) -> Self {
        Self {
            backend,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn category_totals(&self, cancel: &CancellationToken) -> Result<Vec<CategoryTotal>> {
        self.fetch(CATEGORY_TOTALS_PATH, cancel, self.backend.category_totals())
            .await
    }

    pub async fn daily_spending(&self, cancel: &CancellationToken) -> Result<Vec<DailySpending>> {
        self.fetch(DAILY_PATH, cancel, self.backend.daily_spending()).await
    }

    /// Plain-language summary; the range is validated before any request
    pub async fn summary_text(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        cancel: &CancellationToken,
    ) -> Result<SummaryText> {
        check_range(start_date, end_date)?;
        self.fetch(
            SUMMARY_TEXT_PATH,
            cancel,
            self.backend.summary_text(start_date, end_date),
        )
        .await
    }

    pub async fn transactions(
        &self,
        filter: &TransactionFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<TransactionRecord>> {
        check_range(filter.start_date, filter.end_date)?;
        self.fetch(TRANSACTIONS_PATH, cancel, self.backend.transactions(filter))
            .await
    }

    async fn fetch<T, F>(&self, endpoint: &str, cancel: &CancellationToken, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let result = run_cancellable(cancel, future).await;
        if let Err(error) = &result {
            if !matches!(error, Error::Cancelled) {
                record(
                    self.logger.as_deref(),
                    LogEvent::new("insights_failed")
                        .with_screen(SCREEN)
                        .with_endpoint(endpoint)
                        .with_error(error),
                );
            }
        }
        result
    }
}

fn check_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(Error::Other(format!(
            "Start date {} is after end date {}",
            s, e
        ))),
        _ => Ok(()),
    }
}
