//! Session lifecycle guard.
//!
//! Once a session starts, the agent has a fixed time to reach a ready state
//! (listening, thinking or speaking). If it does not, the session is torn
//! down and the user is told why, with wording that depends on whether the
//! agent ever joined the room.

use dxvoice_types::AgentState;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long the agent has to become ready after the session starts.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which notice to show when the agent times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The agent never joined the room.
    AgentDidNotJoin,
    /// The agent joined but never became ready.
    AgentFailedToInitialize,
}

impl NoticeKind {
    /// Picks the notice for the state the agent was stuck in.
    pub fn for_state(state: AgentState) -> Self {
        if state == AgentState::Connecting {
            Self::AgentDidNotJoin
        } else {
            Self::AgentFailedToInitialize
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::AgentDidNotJoin => {
                "Session ended: the voice agent did not join the room. Please try again."
            }
            Self::AgentFailedToInitialize => {
                "Session ended: the voice agent joined but failed to initialize. Please try again."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The agent reached this ready state in time.
    Ready(AgentState),
    /// The timeout elapsed while the agent was in this state.
    TimedOut(AgentState),
    /// The state channel closed before either happened.
    Closed,
}

/// Waits until the agent state is ready or `timeout` elapses.
pub async fn await_agent_ready(
    mut states: watch::Receiver<AgentState>,
    timeout: Duration,
) -> GuardOutcome {
    let wait = async {
        loop {
            let state = *states.borrow_and_update();
            if state.is_ready() {
                return Some(state);
            }
            if states.changed().await.is_err() {
                return None;
            }
        }
    };

    let result = tokio::time::timeout(timeout, wait).await;
    match result {
        Ok(Some(state)) => GuardOutcome::Ready(state),
        Ok(None) => GuardOutcome::Closed,
        Err(_) => GuardOutcome::TimedOut(*states.borrow()),
    }
}

/// Owns the single pending readiness timer of a session.
///
/// Arming replaces any pending timer; dropping the guard cancels it.
#[derive(Debug, Default)]
pub struct LifecycleGuard {
    task: Option<JoinHandle<()>>,
}

impl LifecycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a timer for a new start transition. `on_outcome` runs once,
    /// unless the timer is canceled first.
    pub fn arm<F>(&mut self, states: watch::Receiver<AgentState>, timeout: Duration, on_outcome: F)
    where
        F: FnOnce(GuardOutcome) + Send + 'static,
    {
        self.cancel();
        self.task = Some(tokio::spawn(async move {
            let outcome = await_agent_ready(states, timeout).await;
            on_outcome(outcome);
        }));
    }

    /// Cancels the pending timer. Returns `true` if one was still running.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) if !task.is_finished() => {
                task.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for LifecycleGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}
