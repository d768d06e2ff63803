//! Settle-delay polling of the diagnostic-data endpoint.
//!
//! Each time the number of assistant messages changes, the poller waits for
//! the settle delay and then issues one fetch. A change arriving during the
//! wait restarts it, so a burst of messages produces a single request. A
//! fetch already in flight is left to finish.
//!
//! The settle delay only narrows the race with the backend persisting the
//! report; it does not close it. There is no retry: the next assistant
//! message is the next attempt.

use crate::client::BackendClient;
use crate::error::SessionError;
use dxvoice_types::StructuredPayload;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Result of one diagnostic fetch.
pub type FetchOutcome = Result<Option<StructuredPayload>, SessionError>;

#[derive(Debug)]
pub struct DiagnosticPoller {
    client: Arc<BackendClient>,
    settle_delay: Duration,
    last_count: Option<usize>,
    pending: Option<JoinHandle<()>>,
}

impl DiagnosticPoller {
    pub fn new(client: Arc<BackendClient>, settle_delay: Duration) -> Self {
        Self {
            client,
            settle_delay,
            last_count: None,
            pending: None,
        }
    }

    /// Records the current assistant-message count and schedules a fetch if
    /// it changed. Returns `true` if a fetch was scheduled.
    ///
    /// A count of zero is recorded but never fetched for.
    pub fn observe_count<F>(&mut self, count: usize, on_result: F) -> bool
    where
        F: FnOnce(FetchOutcome) + Send + 'static,
    {
        if self.last_count == Some(count) {
            return false;
        }
        self.last_count = Some(count);
        self.cancel();

        if count == 0 {
            return false;
        }

        let client = Arc::clone(&self.client);
        let delay = self.settle_delay;
        debug!(count, delay_ms = delay.as_millis() as u64, "scheduling diagnostic fetch");

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later trigger cancels only the wait.
            tokio::spawn(async move {
                let outcome = client.diagnostic_data().await;
                match &outcome {
                    Ok(Some(_)) => debug!(count, "diagnostic data received"),
                    Ok(None) => debug!(count, "diagnostic data empty, keeping current report"),
                    Err(e) => warn!(count, "diagnostic fetch failed, keeping current report: {}", e),
                }
                on_result(outcome);
            });
        }));
        true
    }

    /// Cancels a pending wait. Returns `true` if one was canceled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(task) if !task.is_finished() => {
                task.abort();
                true
            }
            _ => false,
        }
    }

    /// Cancels a pending wait and forgets the last count, so the next
    /// snapshot schedules a fetch even if its count is unchanged.
    pub fn reset(&mut self) {
        self.cancel();
        self.last_count = None;
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for DiagnosticPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}
