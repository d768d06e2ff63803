//! Transcript line extraction.

use crate::channel::DualChannel;
use crate::decode_object;
use serde::Deserialize;

#[derive(Deserialize)]
struct SpokenEnvelope {
    voice_output: String,
}

/// Returns the short, speakable form of a raw message for the transcript.
///
/// Rules, first match wins:
/// 1. a JSON object with a string `voice_output` field yields that field;
/// 2. a dual-channel message yields its speech channel, trimmed;
/// 3. anything else is returned unchanged.
pub fn display_text(raw: &str) -> String {
    if let Some(envelope) = decode_object::<SpokenEnvelope>(raw) {
        return envelope.voice_output;
    }
    if let Some(channel) = DualChannel::parse(raw) {
        return channel.voice.trim().to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_output_wins() {
        let raw = r#"{"voice_output":"Restart the router.","diagnostic_report":{"content":"long"}}"#;
        assert_eq!(display_text(raw), "Restart the router.");
    }

    #[test]
    fn voice_output_is_not_trimmed() {
        assert_eq!(display_text(r#"{"voice_output":"  spaced "}"#), "  spaced ");
    }

    #[test]
    fn non_string_voice_output_falls_through() {
        let raw = r#"{"voice_output":42}"#;
        assert_eq!(display_text(raw), raw);
    }

    #[test]
    fn dual_channel_speech_is_trimmed() {
        assert_eq!(display_text("VOICE:  Hi there \n|||TEXT:details"), "Hi there");
    }

    #[test]
    fn plain_text_is_identity() {
        for raw in ["Hello", "", "{not json", "[\"voice_output\"]", "VOICE:missing delimiter"] {
            assert_eq!(display_text(raw), raw);
        }
    }

    #[test]
    fn json_array_is_not_an_envelope() {
        assert_eq!(display_text(r#"["hi"]"#), r#"["hi"]"#);
    }
}
