//! Tally Core - client logic for uploading bank CSVs and viewing insights
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Shapes exchanged with the backend (SelectedFile, SummaryData, ...)
//! - **ports**: Traits for external collaborators (backend, file picker, notifier)
//! - **services**: Screen flows (upload, summary, insights) and the event log
//! - **adapters**: Concrete implementations (reqwest client, local picker)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use adapters::http::ApiClient;
use config::Config;
use ports::{FilePicker, Notifier};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{SelectedFile, SummaryData, UploadOutcome};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for Tally operations
///
/// Loads the configuration once and builds the single API client every
/// service shares.
pub struct TallyContext {
    pub config: Config,
    pub tally_dir: PathBuf,
    pub logger: Option<Arc<LoggingService>>,
    pub upload_service: Arc<UploadService>,
    pub summary_service: Arc<SummaryService>,
    pub insights_service: InsightsService,
}

impl TallyContext {
    /// Create a new Tally context
    pub fn new(
        tally_dir: &Path,
        notifier: Arc<dyn Notifier>,
        logger: Option<Arc<LoggingService>>,
    ) -> Result<Self> {
        let config = Config::load(tally_dir)?;
        let api = Arc::new(ApiClient::new(&config)?);

        let upload_service = Arc::new(
            UploadService::new(
                api.clone(),
                notifier,
                config.upload_path.clone(),
                config.error_messages,
            )
            .with_logger(logger.clone()),
        );
        let summary_service = Arc::new(
            SummaryService::new(api.clone(), config.error_messages).with_logger(logger.clone()),
        );
        let insights_service = InsightsService::new(api).with_logger(logger.clone());

        Ok(Self {
            config,
            tally_dir: tally_dir.to_path_buf(),
            logger,
            upload_service,
            summary_service,
            insights_service,
        })
    }

    /// Upload screen bound to a picker
    pub fn upload_screen(&self, picker: Arc<dyn FilePicker>) -> UploadScreen {
        UploadScreen::new(Arc::clone(&self.upload_service), picker)
    }

    pub fn summary_screen(&self) -> SummaryScreen {
        SummaryScreen::new(Arc::clone(&self.summary_service))
    }

    /// Where the picker copies files before upload
    pub fn cache_dir(&self) -> PathBuf {
        Config::cache_dir(&self.tally_dir)
    }
}
