//! Summary service - fetch and hold the income/expense/net snapshot

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::logging::{record, LogEvent, LoggingService};
use super::messages::{ErrorMessagePolicy, UserAction};
use super::run_cancellable;
use crate::adapters::http::SUMMARY_PATH;
use crate::domain::result::{Error, Result};
use crate::domain::SummaryData;
use crate::ports::InsightsBackend;

const SCREEN: &str = "summary";

/// What the summary screen shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SummaryState {
    Loading,
    Loaded(SummaryData),
    /// Terminal error state; `message` is safe to show
    Failed { message: String },
    /// The screen went away before the response arrived
    Cancelled,
}

impl SummaryState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SummaryState::Loading)
    }
}

pub struct SummaryService {
    backend: Arc<dyn InsightsBackend>,
    logger: Option<Arc<LoggingService>>,
    policy: ErrorMessagePolicy,
}

impl SummaryService {
    pub fn new(backend: Arc<dyn InsightsBackend>, policy: ErrorMessagePolicy) -> Self {
        Self {
            backend,
            logger: None,
            policy,
        }
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    /// Fetch a fresh summary; nothing is cached between calls
    pub async fn load_summary(&self, cancel: &CancellationToken) -> Result<SummaryData> {
        let result = run_cancellable(cancel, self.backend.summary()).await;

        let event = match &result {
            Ok(_) => LogEvent::new("summary_loaded"),
            Err(Error::Cancelled) => LogEvent::new("summary_cancelled"),
            Err(error) => LogEvent::new("summary_failed").with_error(error),
        };
        record(
            self.logger.as_deref(),
            event.with_screen(SCREEN).with_endpoint(SUMMARY_PATH),
        );

        result
    }

    /// Fetch and map the result onto a terminal screen state
    pub async fn fetch_state(&self, cancel: &CancellationToken) -> SummaryState {
        match self.load_summary(cancel).await {
            Ok(data) => SummaryState::Loaded(data),
            Err(Error::Cancelled) => SummaryState::Cancelled,
            Err(error) => SummaryState::Failed {
                message: self.policy.user_message(UserAction::LoadSummary, &error),
            },
        }
    }
}

/// The summary screen
///
/// Each activation resets to `Loading` and fetches again, so a previous
/// activation's data is never shown. Dropping the screen cancels any
/// outstanding fetch.
pub struct SummaryScreen {
    service: Arc<SummaryService>,
    state: Arc<Mutex<SummaryState>>,
    lifetime: CancellationToken,
}

impl SummaryScreen {
    pub fn new(service: Arc<SummaryService>) -> Self {
        Self {
            service,
            state: Arc::new(Mutex::new(SummaryState::Loading)),
            lifetime: CancellationToken::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> SummaryState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(SummaryState::Loading)
    }

    /// Activate the screen: one fetch, then a terminal state
    pub async fn activate(&self) -> SummaryState {
        activate(&self.service, &self.state, &self.lifetime.child_token()).await
    }

    /// Activate in a background task tied to this screen
    pub fn start(&self) -> JoinHandle<SummaryState> {
        let service = Arc::clone(&self.service);
        let state = Arc::clone(&self.state);
        let cancel = self.lifetime.child_token();
        tokio::spawn(async move { activate(&service, &state, &cancel).await })
    }

    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.clone()
    }
}

impl Drop for SummaryScreen {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

async fn activate(
    service: &SummaryService,
    state: &Mutex<SummaryState>,
    cancel: &CancellationToken,
) -> SummaryState {
    set_state(state, SummaryState::Loading);
    let next = service.fetch_state(cancel).await;
    set_state(state, next.clone());
    next
}

fn set_state(state: &Mutex<SummaryState>, next: SummaryState) {
    if let Ok(mut current) = state.lock() {
        *current = next;
    }
}
