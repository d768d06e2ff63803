//! Shared types for the dxvoice session core.
//!
//! This crate provides the data model used across all dxvoice crates:
//! chat messages received from the media room, diagnostic payloads shown in
//! the report panel, the agent lifecycle states reported by the room, and
//! the selectors sent when requesting connection details.
//!
//! No crate in the workspace depends on anything *except* `dxvoice-types` for
//! cross-cutting type definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod connection;
pub mod message;
pub mod payload;

pub use connection::ConnectionDetails;
pub use message::{assistant_count, ChatMessage};
pub use payload::{DiagnosticPayload, StructuredPayload, WebSource, YoutubeVideo};

/// Errors produced when parsing selector strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("unknown agent state: {0}")]
    UnknownAgentState(String),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("unknown voice base: {0}")]
    UnknownVoiceBase(String),

    #[error("unknown resolver variant: {0}")]
    UnknownVariant(String),
}

/// Lifecycle state of the voice agent as reported by the media room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    /// No room connection.
    #[default]
    Disconnected,
    /// The room is connected but the agent has not joined yet.
    Connecting,
    /// The agent joined and is loading its pipeline.
    Initializing,
    /// Ready and waiting for the user to speak.
    Listening,
    /// Ready and producing a response.
    Thinking,
    /// Ready and speaking a response.
    Speaking,
}

impl AgentState {
    /// Returns `true` for the states in which the agent can hold a conversation.
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Listening | Self::Thinking | Self::Speaking)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Initializing => "initializing",
            Self::Listening => "listening",
            Self::Thinking => "thinking",
            Self::Speaking => "speaking",
        }
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentState {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disconnected" => Ok(Self::Disconnected),
            "connecting" => Ok(Self::Connecting),
            "initializing" => Ok(Self::Initializing),
            "listening" => Ok(Self::Listening),
            "thinking" => Ok(Self::Thinking),
            "speaking" => Ok(Self::Speaking),
            _ => Err(TypesError::UnknownAgentState(s.to_string())),
        }
    }
}

/// Conversation language requested from the agent backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Kannada.
    Kn,
    /// Hindi.
    Hi,
    /// Tamil.
    Ta,
}

impl Language {
    /// Returns the query-string code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Kn => "kn",
            Self::Hi => "hi",
            Self::Ta => "ta",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "kn" => Ok(Self::Kn),
            "hi" => Ok(Self::Hi),
            "ta" => Ok(Self::Ta),
            _ => Err(TypesError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Which agent persona the backend should dispatch into the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VoiceBase {
    #[default]
    #[serde(rename = "Voice Assistant")]
    VoiceAssistant,
    #[serde(rename = "Live Assistant")]
    LiveAssistant,
}

impl VoiceBase {
    /// Returns the label sent as the `voiceBase` query parameter.
    pub fn label(self) -> &'static str {
        match self {
            Self::VoiceAssistant => "Voice Assistant",
            Self::LiveAssistant => "Live Assistant",
        }
    }
}

impl std::str::FromStr for VoiceBase {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Voice Assistant" => Ok(Self::VoiceAssistant),
            "Live Assistant" => Ok(Self::LiveAssistant),
            _ => Err(TypesError::UnknownVoiceBase(s.to_string())),
        }
    }
}

/// Where the report panel takes its payload from.
///
/// A deployment picks exactly one variant; a session never runs both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverVariant {
    /// Parse the newest assistant message on the client.
    LocalParse,
    /// Poll the diagnostic-data endpoint after assistant messages arrive.
    #[default]
    RemoteFetch,
}

impl std::str::FromStr for ResolverVariant {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local_parse" => Ok(Self::LocalParse),
            "remote_fetch" => Ok(Self::RemoteFetch),
            _ => Err(TypesError::UnknownVariant(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_states() {
        assert!(AgentState::Listening.is_ready());
        assert!(AgentState::Thinking.is_ready());
        assert!(AgentState::Speaking.is_ready());
        assert!(!AgentState::Connecting.is_ready());
        assert!(!AgentState::Initializing.is_ready());
        assert!(!AgentState::Disconnected.is_ready());
    }

    #[test]
    fn agent_state_parses_wire_names() {
        for state in [
            AgentState::Disconnected,
            AgentState::Connecting,
            AgentState::Initializing,
            AgentState::Listening,
            AgentState::Thinking,
            AgentState::Speaking,
        ] {
            assert_eq!(state.as_str().parse::<AgentState>(), Ok(state));
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
        assert_eq!(
            "booting".parse::<AgentState>(),
            Err(TypesError::UnknownAgentState("booting".to_string()))
        );
    }

    #[test]
    fn voice_base_uses_display_labels() {
        let json = serde_json::to_string(&VoiceBase::LiveAssistant).unwrap();
        assert_eq!(json, "\"Live Assistant\"");
        assert_eq!(
            "Voice Assistant".parse::<VoiceBase>(),
            Ok(VoiceBase::VoiceAssistant)
        );
        assert!("voice".parse::<VoiceBase>().is_err());
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::Kn.code(), "kn");
        assert_eq!("ta".parse::<Language>(), Ok(Language::Ta));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn variant_parses_config_names() {
        assert_eq!(
            "local_parse".parse::<ResolverVariant>(),
            Ok(ResolverVariant::LocalParse)
        );
        let v: ResolverVariant = serde_json::from_str("\"remote_fetch\"").unwrap();
        assert_eq!(v, ResolverVariant::RemoteFetch);
    }
}
