//! Connection descriptor returned by the connection-details endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a client needs to join the real-time room.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    /// WebSocket URL of the media server.
    pub server_url: String,
    /// Name of the room created for this session.
    pub room_name: String,
    /// Display name assigned to the local participant.
    pub participant_name: String,
    /// Join token for the local participant.
    pub participant_token: String,
}

impl fmt::Debug for ConnectionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDetails")
            .field("server_url", &self.server_url)
            .field("room_name", &self.room_name)
            .field("participant_name", &self.participant_name)
            .field("participant_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let details = ConnectionDetails {
            server_url: "wss://media.example.com".to_string(),
            room_name: "voice_room_1".to_string(),
            participant_name: "user".to_string(),
            participant_token: "secret-jwt".to_string(),
        };
        let debug = format!("{:?}", details);
        assert!(debug.contains("voice_room_1"));
        assert!(!debug.contains("secret-jwt"));
    }

    #[test]
    fn decodes_camel_case_descriptor() {
        let details: ConnectionDetails = serde_json::from_str(
            r#"{"serverUrl":"wss://m","roomName":"r","participantName":"p","participantToken":"t"}"#,
        )
        .unwrap();
        assert_eq!(details.server_url, "wss://m");
        assert_eq!(details.participant_token, "t");
    }
}
