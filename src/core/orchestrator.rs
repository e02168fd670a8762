//! Lifecycle of a prediction request
//!
//! Idle -> Loading -> Succeeded | Failed, restarting at Loading on every
//! submission. Each submission is numbered; a response is applied only if
//! no newer submission has started since, so a slow stale request can never
//! overwrite the result of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::api::{ClientError, PredictionService};
use crate::config::ConfigStore;
use crate::models::{HealthRecord, PredictionResponse};

/// Shown when a failure carries no description of its own.
pub const FALLBACK_ERROR: &str = "Failed to get prediction";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(PredictionResponse),
    Failed(String),
}

impl RequestState {
    fn from_result(result: Result<PredictionResponse, ClientError>) -> Self {
        match result {
            Ok(response) => RequestState::Succeeded(response),
            Err(e) => RequestState::Failed(failure_message(&e)),
        }
    }
}

fn failure_message(error: &dyn std::fmt::Display) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        message
    }
}

/// Owns the single visible [`RequestState`].
pub struct Orchestrator<S> {
    service: S,
    config: Arc<ConfigStore>,
    latest: AtomicU64,
    state: watch::Sender<RequestState>,
}

impl<S: PredictionService> Orchestrator<S> {
    pub fn new(service: S, config: Arc<ConfigStore>) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self {
            service,
            config,
            latest: AtomicU64::new(0),
            state,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    /// Sends `record` and resolves into `Succeeded` or `Failed`.
    ///
    /// The previous result is cleared before the request goes out. Errors
    /// never escape; they become the `Failed` state. The returned state is
    /// this submission's outcome even when a newer submission has taken
    /// over the visible state.
    #[instrument(skip(self, record))]
    pub async fn submit(&self, record: HealthRecord) -> RequestState {
        let mut seq = 0;
        self.state.send_modify(|state| {
            seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *state = RequestState::Loading;
        });

        let base_url = self.config.base_url().await;
        info!(seq, api_url = %base_url, "submitting prediction request");

        let outcome = RequestState::from_result(self.service.predict(&base_url, &record).await);
        match &outcome {
            RequestState::Succeeded(_) => info!(seq, "prediction complete"),
            RequestState::Failed(message) => warn!(seq, "prediction failed: {}", message),
            _ => {}
        }

        let applied = self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) == seq {
                *state = outcome.clone();
                true
            } else {
                false
            }
        });
        if !applied {
            debug!(seq, "discarding stale response");
        }

        outcome
    }

    /// Returns to `Idle`. Responses still in flight are discarded.
    pub fn dismiss(&self) {
        self.state.send_modify(|state| {
            self.latest.fetch_add(1, Ordering::SeqCst);
            *state = RequestState::Idle;
        });
    }
}
