//! File picker port
//!
//! Abstracts the platform file-selection capability (a native dialog on
//! mobile, a path argument or prompt in the terminal).

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{PickedAsset, CSV_MIME_TYPE};

/// What the caller asks the picker for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    /// Only files of this type may be selected
    pub mime_type: &'static str,
    /// Copy the selection into the app-local cache so it stays readable
    pub copy_to_cache: bool,
}

impl PickRequest {
    /// A single CSV file, copied into the cache
    pub fn csv() -> Self {
        Self {
            mime_type: CSV_MIME_TYPE,
            copy_to_cache: true,
        }
    }
}

/// Result of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// The user dismissed the picker
    Cancelled,
    Picked(Vec<PickedAsset>),
}

#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Ask the user for a file
    ///
    /// Errors are picker failures; dismissal is `Ok(PickOutcome::Cancelled)`.
    async fn pick(&self, request: &PickRequest) -> Result<PickOutcome>;
}
