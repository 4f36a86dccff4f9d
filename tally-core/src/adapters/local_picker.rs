//! Local filesystem picker
//!
//! Resolves a selection the user already made (a path argument or a prompt
//! answer) into a [`PickedAsset`]. No selection means the picker was
//! dismissed.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::domain::result::{Error, Result};
use crate::domain::PickedAsset;
use crate::ports::{FilePicker, PickOutcome, PickRequest};

/// Picker backed by a path on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFilePicker {
    selection: Option<PathBuf>,
    cache_dir: PathBuf,
}

impl LocalFilePicker {
    pub fn new(selection: Option<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            selection,
            cache_dir: cache_dir.into(),
        }
    }

    /// Copy the file into the cache under a unique name
    async fn copy_to_cache(&self, source: &Path, name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.cache_dir).await.map_err(|e| {
            Error::picker(format!(
                "Cannot create cache directory {}: {}",
                self.cache_dir.display(),
                e
            ))
        })?;

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let target = self.cache_dir.join(format!("{}-{}", stamp, name));

        tokio::fs::copy(source, &target)
            .await
            .map_err(|e| Error::picker(format!("Cannot copy {} to cache: {}", source.display(), e)))?;

        Ok(target)
    }
}

#[async_trait]
impl FilePicker for LocalFilePicker {
    async fn pick(&self, request: &PickRequest) -> Result<PickOutcome> {
        let Some(path) = self.selection.as_deref() else {
            return Ok(PickOutcome::Cancelled);
        };

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::picker(format!("Cannot open {}: {}", path.display(), e)))?;
        if !metadata.is_file() {
            return Err(Error::picker(format!("{} is not a file", path.display())));
        }

        let mime_type = mime_type_for(path);
        if mime_type != Some(request.mime_type) {
            return Err(Error::picker(format!(
                "{} is not a {} file",
                path.display(),
                request.mime_type
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty());

        let uri = if request.copy_to_cache {
            let cache_name = name.as_deref().unwrap_or(crate::domain::DEFAULT_FILE_NAME);
            self.copy_to_cache(path, cache_name).await?
        } else {
            path.to_path_buf()
        };

        Ok(PickOutcome::Picked(vec![PickedAsset {
            uri,
            name,
            mime_type: mime_type.map(str::to_string),
        }]))
    }
}

/// MIME type by extension; only the types the client accepts are known
fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some(crate::domain::CSV_MIME_TYPE),
        _ => None,
    }
}
