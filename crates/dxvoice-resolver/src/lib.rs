//! Message content resolution for the dxvoice session core.
//!
//! Assistant messages reach the client in several historical formats:
//!
//! | Format | Example |
//! |--------|---------|
//! | plain text | `Check the cable.` |
//! | dual-channel | `VOICE:Check the cable.\|\|\|TEXT:{"content":"..."}` |
//! | legacy JSON | `{"voice_output":"...","text_output":{"content":"..."}}` |
//! | current JSON | `{"voice_output":"...","diagnostic_report":{"content":"..."}}` |
//!
//! This crate recovers two things from them: a short, speakable line for the
//! transcript ([`display_text`]) and the diagnostic report for the side panel
//! ([`resolve_messages`], [`DiagnosticFetchResult`]). The report body is
//! turned into display markup by [`render_markup`].
//!
//! Everything here is synchronous and side-effect free. Malformed input is
//! never an error: each format is tried in priority order and anything that
//! does not match falls through to the next rule.

pub mod channel;
pub mod extract;
pub mod fetch;
pub mod format;
pub mod holder;
mod report;
pub mod resolve;

pub use channel::{DualChannel, MAX_MESSAGE_BYTES};
pub use extract::display_text;
pub use fetch::DiagnosticFetchResult;
pub use format::{render_markup, render_panel, PanelView, VideoCard};
pub use holder::PayloadHolder;
pub use resolve::{resolve_content, resolve_messages, Resolution};

use serde::de::DeserializeOwned;

/// Decodes `raw` into `T` only if it is a JSON object.
///
/// Derived struct decoders also accept JSON arrays, which never carry any of
/// the message formats, so anything but an object is rejected up front.
pub(crate) fn decode_object<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}
