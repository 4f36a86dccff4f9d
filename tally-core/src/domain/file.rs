//! File selection types

use std::path::PathBuf;

use serde::Serialize;

/// MIME type accepted by the picker and sent with the upload part
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Display name used when the picker does not provide one
pub const DEFAULT_FILE_NAME: &str = "file.csv";

/// A raw entry returned by a file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedAsset {
    /// Local location of the file (possibly inside the app cache)
    pub uri: PathBuf,
    pub name: Option<String>,
    pub mime_type: Option<String>,
}

/// The file handed to the upload call
///
/// Built once per selection and consumed by the upload request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub uri: PathBuf,
    pub name: String,
    pub mime_type: &'static str,
}

impl SelectedFile {
    /// Build the upload descriptor from a picker entry
    pub fn from_asset(asset: &PickedAsset) -> Self {
        let name = asset
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();

        Self {
            uri: asset.uri.clone(),
            name,
            mime_type: CSV_MIME_TYPE,
        }
    }
}
