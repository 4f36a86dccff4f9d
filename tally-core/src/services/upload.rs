//! Upload service - pick a CSV and post it to the backend
//!
//! One shared flow for every upload entry point, parameterized by the
//! upload route and the error-message policy.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::logging::{record, LogEvent, LoggingService};
use super::messages::{ErrorMessagePolicy, UserAction, UPLOAD_FAILED_TITLE, UPLOAD_SUCCESS_TITLE};
use super::run_cancellable;
use crate::domain::result::{Error, Result};
use crate::domain::{SelectedFile, UploadOutcome, UploadResponse};
use crate::ports::{FilePicker, InsightsBackend, Notification, Notifier, PickOutcome, PickRequest};

const SCREEN: &str = "upload";

pub struct UploadService {
    backend: Arc<dyn InsightsBackend>,
    notifier: Arc<dyn Notifier>,
    logger: Option<Arc<LoggingService>>,
    upload_path: String,
    policy: ErrorMessagePolicy,
}

impl UploadService {
    pub fn new(
        backend: Arc<dyn InsightsBackend>,
        notifier: Arc<dyn Notifier>,
        upload_path: impl Into<String>,
        policy: ErrorMessagePolicy,
    ) -> Self {
        Self {
            backend,
            notifier,
            logger: None,
            upload_path: upload_path.into(),
            policy,
        }
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    /// Pick a CSV and upload it
    ///
    /// A dismissed picker or a cancelled request ends silently. Every other
    /// path ends with exactly one notification.
    pub async fn pick_and_upload(
        &self,
        picker: &dyn FilePicker,
        cancel: &CancellationToken,
    ) -> UploadOutcome {
        match self.try_upload(picker, cancel).await {
            Ok(None) => UploadOutcome::Cancelled,
            Ok(Some((file, response))) => {
                let message = response.success_message();
                record(
                    self.logger.as_deref(),
                    LogEvent::new("upload_succeeded")
                        .with_screen(SCREEN)
                        .with_endpoint(&self.upload_path),
                );
                self.notifier
                    .notify(Notification::success(UPLOAD_SUCCESS_TITLE, message.clone()));
                UploadOutcome::Uploaded {
                    file_name: file.name,
                    message,
                }
            }
            Err(Error::Cancelled) => {
                record(
                    self.logger.as_deref(),
                    LogEvent::new("upload_cancelled")
                        .with_screen(SCREEN)
                        .with_endpoint(&self.upload_path),
                );
                UploadOutcome::Cancelled
            }
            Err(error) => {
                record(
                    self.logger.as_deref(),
                    LogEvent::new("upload_failed")
                        .with_screen(SCREEN)
                        .with_endpoint(&self.upload_path)
                        .with_error(&error),
                );
                let user_message = self.policy.user_message(UserAction::Upload, &error);
                self.notifier
                    .notify(Notification::failure(UPLOAD_FAILED_TITLE, user_message.clone()));
                UploadOutcome::Failed { user_message }
            }
        }
    }

    /// `Ok(None)` when the user dismissed the picker
    async fn try_upload(
        &self,
        picker: &dyn FilePicker,
        cancel: &CancellationToken,
    ) -> Result<Option<(SelectedFile, UploadResponse)>> {
        let outcome = run_cancellable(cancel, picker.pick(&PickRequest::csv())).await?;

        let assets = match outcome {
            PickOutcome::Cancelled => return Ok(None),
            PickOutcome::Picked(assets) => assets,
        };
        let asset = assets
            .first()
            .ok_or_else(|| Error::picker("No file was selected"))?;
        let file = SelectedFile::from_asset(asset);

        let response =
            run_cancellable(cancel, self.backend.upload_csv(&self.upload_path, &file)).await?;

        Ok(Some((file, response)))
    }
}

/// The upload screen: a picker bound to the shared upload flow
///
/// Dropping the screen cancels any upload it started.
pub struct UploadScreen {
    service: Arc<UploadService>,
    picker: Arc<dyn FilePicker>,
    lifetime: CancellationToken,
}

impl UploadScreen {
    pub fn new(service: Arc<UploadService>, picker: Arc<dyn FilePicker>) -> Self {
        Self {
            service,
            picker,
            lifetime: CancellationToken::new(),
        }
    }

    /// Handle a press of the upload button
    pub async fn pick_and_upload(&self) -> UploadOutcome {
        let cancel = self.lifetime.child_token();
        self.service
            .pick_and_upload(self.picker.as_ref(), &cancel)
            .await
    }

    /// Run the flow as a background task tied to this screen
    pub fn start(&self) -> JoinHandle<UploadOutcome> {
        let service = Arc::clone(&self.service);
        let picker = Arc::clone(&self.picker);
        let cancel = self.lifetime.child_token();
        tokio::spawn(async move { service.pick_and_upload(picker.as_ref(), &cancel).await })
    }

    /// Token cancelled when the screen goes away
    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.clone()
    }
}

impl Drop for UploadScreen {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
