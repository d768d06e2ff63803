//! Report bodies as they arrive over the wire.
//!
//! Only `content` decides whether a body is a report. The link lists are
//! decoded entry by entry: a list that is not an array reads as empty, and
//! entries that do not decode are dropped without rejecting the rest.

use dxvoice_types::{StructuredPayload, WebSource, YoutubeVideo};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Report body inside an assistant message. `content` must be a string.
#[derive(Deserialize)]
pub(crate) struct ReportBody {
    content: String,
    #[serde(default)]
    web_sources: Value,
    #[serde(default)]
    youtube_videos: Value,
}

impl From<ReportBody> for StructuredPayload {
    fn from(body: ReportBody) -> Self {
        Self {
            main_content: body.content,
            web_sources: decode_list(body.web_sources),
            youtube_videos: decode_list(body.youtube_videos),
        }
    }
}

/// Report body from the diagnostic-data endpoint, where `content` may be
/// missing or `null`.
#[derive(Deserialize)]
pub(crate) struct FetchedReport {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    web_sources: Value,
    #[serde(default)]
    youtube_videos: Value,
}

impl From<FetchedReport> for StructuredPayload {
    fn from(body: FetchedReport) -> Self {
        Self {
            main_content: body.content.unwrap_or_default(),
            web_sources: decode_list(body.web_sources),
            youtube_videos: decode_list(body.youtube_videos),
        }
    }
}

/// Keeps the entries of a JSON array that decode as `T`.
fn decode_list<T: DeserializeOwned>(list: Value) -> Vec<T> {
    let Value::Array(items) = list else {
        if !list.is_null() {
            tracing::trace!("link list is not an array, ignoring it");
        }
        return Vec::new();
    };

    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if kept.len() < total {
        tracing::trace!(dropped = total - kept.len(), "dropped malformed link entries");
    }
    kept
}
