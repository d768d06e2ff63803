//! The dual-channel `VOICE:<speech>|||TEXT:<detail>` message format.
//!
//! The speech channel is what the agent says aloud; the detail channel holds
//! the report, optionally as JSON. Splitting is plain substring search:
//! [`DualChannel::parse`] splits on the first delimiter and
//! [`DualChannel::find`] on the last. Inputs over [`MAX_MESSAGE_BYTES`] are
//! never treated as dual-channel.

/// Largest message considered for dual-channel splitting (64 KiB).
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024;

const VOICE_MARKER: &str = "VOICE:";
const TEXT_DELIMITER: &str = "|||TEXT:";

/// A message split into its speech and detail channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualChannel<'a> {
    pub voice: &'a str,
    pub text: &'a str,
}

impl<'a> DualChannel<'a> {
    /// Splits a message that starts with the `VOICE:` marker.
    pub fn parse(raw: &'a str) -> Option<Self> {
        if raw.len() > MAX_MESSAGE_BYTES {
            return None;
        }
        Self::split(raw.strip_prefix(VOICE_MARKER)?)
    }

    /// Splits a message that contains the `VOICE:` marker anywhere, ignoring
    /// whatever precedes it. The detail channel starts after the last
    /// delimiter.
    pub fn find(raw: &'a str) -> Option<Self> {
        if raw.len() > MAX_MESSAGE_BYTES {
            return None;
        }
        let start = raw.find(VOICE_MARKER)?;
        let (voice, text) = raw[start + VOICE_MARKER.len()..].rsplit_once(TEXT_DELIMITER)?;
        Some(Self { voice, text })
    }

    fn split(rest: &'a str) -> Option<Self> {
        let (voice, text) = rest.split_once(TEXT_DELIMITER)?;
        Some(Self { voice, text })
    }
}
