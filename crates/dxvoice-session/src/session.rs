//! The session event loop.
//!
//! A [`Session`] owns all per-session state and is driven by one task:
//! events from the room come in, updates for the UI go out. Timers run in
//! spawned tasks and report back over an internal channel, so no state is
//! shared and nothing needs a lock.

use crate::client::BackendClient;
use crate::error::SessionError;
use crate::guard::{GuardOutcome, LifecycleGuard, NoticeKind};
use crate::poller::{DiagnosticPoller, FetchOutcome};
use crate::settings::SessionSettings;
use dxvoice_resolver::{display_text, render_panel, resolve_messages, PanelView, PayloadHolder};
use dxvoice_types::{
    assistant_count, AgentState, ChatMessage, ConnectionDetails, Language, ResolverVariant,
    VoiceBase,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Input to a session, one per line on the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The user pressed start. Missing selectors fall back to the settings.
    Start {
        #[serde(default)]
        language: Option<Language>,
        #[serde(default)]
        voice_base: Option<VoiceBase>,
    },
    /// A new snapshot of the room's message list.
    Messages { messages: Vec<ChatMessage> },
    /// The room reported a new agent state.
    AgentState { state: AgentState },
    /// The user left or the component was torn down.
    End,
}

/// Output of a session for the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionUpdate {
    Connection { details: ConnectionDetails },
    Transcript { lines: Vec<TranscriptLine> },
    Panel { panel: PanelView },
    Notice { kind: NoticeKind, message: String },
    Disconnect,
    Error { message: String },
}

/// One transcript row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptLine {
    pub id: String,
    pub origin_is_local: bool,
    pub text: String,
}

impl TranscriptLine {
    pub fn from_message(message: &ChatMessage) -> Self {
        Self {
            id: message.id.clone(),
            origin_is_local: message.origin_is_local,
            text: display_text(&message.content),
        }
    }
}

/// Results reported back to the loop by spawned timers.
#[derive(Debug)]
enum Internal {
    Connected {
        generation: u64,
        result: Result<ConnectionDetails, SessionError>,
    },
    Fetched(FetchOutcome),
    Guard { generation: u64, outcome: GuardOutcome },
}

pub struct Session {
    id: Uuid,
    settings: SessionSettings,
    client: Arc<BackendClient>,
    holder: PayloadHolder,
    transcript: Vec<TranscriptLine>,
    poller: DiagnosticPoller,
    guard: LifecycleGuard,
    connecting: Option<JoinHandle<()>>,
    agent_state: watch::Sender<AgentState>,
    start_generation: u64,
    internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Result<Self, SessionError> {
        settings.validate()?;
        let client = BackendClient::from_settings(&settings)?;
        Ok(Self::with_client(settings, client))
    }

    pub fn with_client(settings: SessionSettings, client: BackendClient) -> Self {
        let client = Arc::new(client);
        let poller = DiagnosticPoller::new(Arc::clone(&client), settings.settle_delay());
        let (agent_state, _) = watch::channel(AgentState::Disconnected);
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();

        Self {
            id: Uuid::new_v4(),
            settings,
            client,
            holder: PayloadHolder::new(),
            transcript: Vec::new(),
            poller,
            guard: LifecycleGuard::new(),
            connecting: None,
            agent_state,
            start_generation: 0,
            internal_tx,
            internal_rx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    /// The report panel as currently displayed.
    pub fn panel(&self) -> PanelView {
        render_panel(&self.holder.current_or_empty())
    }

    /// Runs the session until an `End` event arrives, the event channel
    /// closes, or nobody is listening for updates.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<SessionEvent>,
        updates: mpsc::Sender<SessionUpdate>,
    ) {
        info!(session = %self.id, variant = ?self.settings.variant, "session started");

        loop {
            let batch = tokio::select! {
                event = events.recv() => match event {
                    Some(SessionEvent::End) | None => break,
                    Some(event) => self.handle_event(event),
                },
                Some(internal) = self.internal_rx.recv() => self.handle_internal(internal),
            };

            for update in batch {
                if updates.send(update).await.is_err() {
                    debug!(session = %self.id, "update receiver dropped");
                    self.teardown();
                    return;
                }
            }
        }

        self.teardown();
        info!(session = %self.id, "session ended");
    }

    /// Applies one event and returns the resulting updates. Network calls
    /// are spawned; their results arrive later through [`Session::run`].
    pub fn handle_event(&mut self, event: SessionEvent) -> Vec<SessionUpdate> {
        match event {
            SessionEvent::Start {
                language,
                voice_base,
            } => {
                let language = language.unwrap_or(self.settings.language);
                let voice_base = voice_base.unwrap_or(self.settings.voice_base);
                self.start(language, voice_base);
                Vec::new()
            }
            SessionEvent::Messages { messages } => self.on_messages(&messages),
            SessionEvent::AgentState { state } => {
                debug!(session = %self.id, %state, "agent state changed");
                self.agent_state.send_replace(state);
                Vec::new()
            }
            SessionEvent::End => {
                self.teardown();
                Vec::new()
            }
        }
    }

    fn start(&mut self, language: Language, voice_base: VoiceBase) {
        if let Some(task) = self.connecting.take() {
            task.abort();
        }
        self.mark_started();

        let generation = self.start_generation;
        let client = Arc::clone(&self.client);
        let tx = self.internal_tx.clone();
        debug!(session = %self.id, language = language.code(), "requesting connection details");
        self.connecting = Some(tokio::spawn(async move {
            let result = client.connection_details(language, voice_base).await;
            let _ = tx.send(Internal::Connected { generation, result });
        }));
    }

    fn on_connected(
        &mut self,
        result: Result<ConnectionDetails, SessionError>,
    ) -> Vec<SessionUpdate> {
        self.connecting = None;
        match result {
            Ok(details) => {
                info!(
                    session = %self.id,
                    room = %details.room_name,
                    "connection details received"
                );
                vec![SessionUpdate::Connection { details }]
            }
            Err(e) => {
                let cause = std::error::Error::source(&e)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("{:?}", e));
                error!(session = %self.id, cause = %cause, "could not start session");
                self.teardown();
                vec![SessionUpdate::Error {
                    message: e.to_string(),
                }]
            }
        }
    }

    /// Marks the session started: the agent is expected to join and become
    /// ready within the agent timeout, counted from now.
    pub fn mark_started(&mut self) {
        self.start_generation += 1;
        self.agent_state.send_replace(AgentState::Connecting);

        let generation = self.start_generation;
        let tx = self.internal_tx.clone();
        self.guard.arm(
            self.agent_state.subscribe(),
            self.settings.agent_timeout(),
            move |outcome| {
                let _ = tx.send(Internal::Guard {
                    generation,
                    outcome,
                });
            },
        );
    }

    fn on_messages(&mut self, messages: &[ChatMessage]) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();

        let lines: Vec<TranscriptLine> = messages.iter().map(TranscriptLine::from_message).collect();
        if lines != self.transcript {
            self.transcript = lines;
            updates.push(SessionUpdate::Transcript {
                lines: self.transcript.clone(),
            });
        }

        match self.settings.variant {
            ResolverVariant::LocalParse => {
                if self.holder.apply_resolution(resolve_messages(messages)) {
                    updates.push(SessionUpdate::Panel {
                        panel: self.panel(),
                    });
                }
            }
            ResolverVariant::RemoteFetch => {
                let tx = self.internal_tx.clone();
                self.poller
                    .observe_count(assistant_count(messages), move |outcome| {
                        let _ = tx.send(Internal::Fetched(outcome));
                    });
            }
        }

        updates
    }

    fn handle_internal(&mut self, internal: Internal) -> Vec<SessionUpdate> {
        match internal {
            Internal::Connected { generation, result } => {
                if generation != self.start_generation {
                    debug!(session = %self.id, generation, "ignoring stale connection details");
                    return Vec::new();
                }
                self.on_connected(result)
            }
            Internal::Fetched(Ok(fetched)) => {
                if self.holder.apply_fetch(fetched) {
                    vec![SessionUpdate::Panel {
                        panel: self.panel(),
                    }]
                } else {
                    Vec::new()
                }
            }
            // Already logged by the poller; the held report stays.
            Internal::Fetched(Err(_)) => Vec::new(),
            Internal::Guard {
                generation,
                outcome,
            } => {
                if generation != self.start_generation {
                    debug!(session = %self.id, generation, "ignoring stale guard outcome");
                    return Vec::new();
                }
                self.on_guard(outcome)
            }
        }
    }

    fn on_guard(&mut self, outcome: GuardOutcome) -> Vec<SessionUpdate> {
        match outcome {
            GuardOutcome::Ready(state) => {
                info!(session = %self.id, %state, "agent ready");
                Vec::new()
            }
            GuardOutcome::TimedOut(state) => {
                let kind = NoticeKind::for_state(state);
                warn!(
                    session = %self.id,
                    %state,
                    notice = ?kind,
                    "agent not ready in time, disconnecting"
                );
                self.teardown();
                vec![
                    SessionUpdate::Notice {
                        kind,
                        message: kind.message().to_string(),
                    },
                    SessionUpdate::Disconnect,
                ]
            }
            GuardOutcome::Closed => Vec::new(),
        }
    }

    /// Cancels all pending timers and requests. Results that were already
    /// queued belong to an older generation and are dropped.
    pub fn teardown(&mut self) {
        self.start_generation += 1;
        if let Some(task) = self.connecting.take() {
            task.abort();
        }
        self.guard.cancel();
        self.poller.reset();
        self.agent_state.send_replace(AgentState::Disconnected);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(task) = self.connecting.take() {
            task.abort();
        }
    }
}
