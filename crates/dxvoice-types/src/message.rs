//! Chat and transcription messages received from the media room.

use serde::{Deserialize, Serialize};

/// A single received chat or transcription message.
///
/// Messages are immutable once received. The room delivers them as ordered
/// snapshots; a newer snapshot supersedes the previous one entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Transport-assigned message identifier.
    pub id: String,
    /// `true` when the local user produced the message.
    pub origin_is_local: bool,
    /// Raw message content, in any of the accepted wire formats.
    pub content: String,
}

impl ChatMessage {
    pub fn new(id: impl Into<String>, origin_is_local: bool, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            origin_is_local,
            content: content.into(),
        }
    }

    /// Returns `true` if the message came from the voice agent.
    pub fn is_assistant(&self) -> bool {
        !self.origin_is_local
    }
}

/// Counts the assistant messages in a snapshot.
pub fn assistant_count(messages: &[ChatMessage]) -> usize {
    messages.iter().filter(|m| m.is_assistant()).count()
}
