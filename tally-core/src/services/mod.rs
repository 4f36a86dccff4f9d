//! Service layer - screen flows and their orchestration
//!
//! Each service coordinates ports for one user-facing flow. Screens own a
//! cancellation token for their lifetime; every request races it.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::domain::result::{Error, Result};

mod insights;
pub mod logging;
pub mod messages;
mod summary;
mod upload;

pub use insights::InsightsService;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use messages::{ErrorMessagePolicy, UserAction};
pub use summary::{SummaryScreen, SummaryService, SummaryState};
pub use upload::{UploadScreen, UploadService};

/// Await `future` unless `cancel` fires first
pub(crate) async fn run_cancellable<T, F>(cancel: &CancellationToken, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = future => result,
    }
}
