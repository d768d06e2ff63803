//! Voice diagnostic session runtime.
//!
//! Joins the backend to the room lifecycle: fetches connection details on
//! start, watches the agent's readiness, keeps the transcript, and keeps the
//! report panel current from either the chat messages or the backend's
//! diagnostic-data endpoint.

pub mod client;
pub mod error;
pub mod guard;
pub mod poller;
pub mod session;
pub mod settings;

pub use client::BackendClient;
pub use error::{SessionError, CONNECTION_DETAILS_MESSAGE};
pub use guard::{await_agent_ready, GuardOutcome, LifecycleGuard, NoticeKind, DEFAULT_AGENT_TIMEOUT};
pub use poller::{DiagnosticPoller, FetchOutcome};
pub use session::{Session, SessionEvent, SessionUpdate, TranscriptLine};
pub use settings::SessionSettings;
