//! Local-parse resolution of the diagnostic report.
//!
//! The newest assistant message is decoded against the known message
//! schemas in priority order:
//!
//! 1. current JSON: `{"diagnostic_report": {"content": ...}}`
//! 2. legacy JSON: `{"text_output": {"content": ...}}`
//! 3. dual-channel: the detail channel as `{"diagnostic_report": {...}}` or a
//!    bare `{"content": ...}`, otherwise the detail text verbatim
//!
//! A message that matches none of them is [`Resolution::Unresolved`], which
//! callers treat as "keep showing what you have".

use crate::channel::DualChannel;
use crate::decode_object;
use crate::report::ReportBody;
use dxvoice_types::{ChatMessage, DiagnosticPayload};
use serde::Deserialize;

/// Outcome of resolving a message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(DiagnosticPayload),
    Unresolved,
}

/// Whole-message schemas, in priority order.
#[derive(Deserialize)]
#[serde(untagged)]
enum MessageEnvelope {
    Current { diagnostic_report: ReportBody },
    Legacy { text_output: ReportBody },
}

/// Detail-channel schemas, in priority order.
#[derive(Deserialize)]
#[serde(untagged)]
enum DetailEnvelope {
    Current { diagnostic_report: ReportBody },
    Bare(ReportBody),
}

/// Resolves the report from the newest assistant message in `messages`.
pub fn resolve_messages(messages: &[ChatMessage]) -> Resolution {
    match messages.iter().rev().find(|m| m.is_assistant()) {
        Some(latest) => resolve_content(&latest.content),
        None => Resolution::Unresolved,
    }
}

/// Resolves the report carried by one raw assistant message.
pub fn resolve_content(raw: &str) -> Resolution {
    if let Some(envelope) = decode_object::<MessageEnvelope>(raw) {
        let body = match envelope {
            MessageEnvelope::Current { diagnostic_report } => diagnostic_report,
            MessageEnvelope::Legacy { text_output } => text_output,
        };
        return Resolution::Resolved(DiagnosticPayload::Structured(body.into()));
    }

    if let Some(channel) = DualChannel::find(raw) {
        if let Some(detail) = decode_object::<DetailEnvelope>(channel.text) {
            let body = match detail {
                DetailEnvelope::Current { diagnostic_report } => diagnostic_report,
                DetailEnvelope::Bare(body) => body,
            };
            return Resolution::Resolved(DiagnosticPayload::Structured(body.into()));
        }
        if !channel.text.trim().is_empty() {
            return Resolution::Resolved(DiagnosticPayload::Plain(channel.text.to_string()));
        }
        tracing::trace!("dual-channel message has an empty detail channel");
        return Resolution::Unresolved;
    }

    tracing::trace!(len = raw.len(), "assistant message carries no report");
    Resolution::Unresolved
}
