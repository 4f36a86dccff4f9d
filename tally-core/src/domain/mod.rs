//! Core domain entities
//!
//! Shapes owned by the backend and consumed here, plus their display rules.
//! Pure data - no I/O.

pub mod amount;
mod file;
mod insights;
pub mod result;
mod summary;
mod upload;

pub use file::{PickedAsset, SelectedFile, CSV_MIME_TYPE, DEFAULT_FILE_NAME};
pub use insights::{CategoryTotal, DailySpending, SummaryText, TransactionFilter, TransactionRecord};
pub use summary::{RenderedSummary, SummaryData};
pub use upload::{UploadOutcome, UploadResponse, DEFAULT_SUCCESS_MESSAGE};
