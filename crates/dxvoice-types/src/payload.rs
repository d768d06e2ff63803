//! Diagnostic report payloads shown in the report panel.
//!
//! A [`StructuredPayload`] carries the report body plus optional supporting
//! links. Its JSON form is the shape used by both the assistant messages and
//! the diagnostic-data endpoint:
//!
//! ```json
//! {"content": "...", "web_sources": [{"title": "...", "url": "..."}],
//!  "youtube_videos": [{"title": "...", "url": "...", "video_id": "..."}]}
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

/// Host that serves video thumbnails.
const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

/// A supporting web page cited by the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    /// May be empty; the link is still shown.
    #[serde(default)]
    pub title: String,
    pub url: String,
}

/// A supporting video cited by the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoutubeVideo {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, alias = "videoId", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

impl YoutubeVideo {
    /// Returns the explicit video id, or one recovered from the watch URL.
    pub fn resolved_video_id(&self) -> Option<String> {
        self.video_id
            .as_deref()
            .filter(|id| is_video_id(id))
            .map(str::to_string)
            .or_else(|| video_id_from_url(&self.url))
    }

    /// Returns the explicit thumbnail, or the default one for the video id.
    pub fn thumbnail_url(&self) -> Option<String> {
        if let Some(thumb) = self.thumbnail.as_deref().filter(|t| !t.is_empty()) {
            return Some(thumb.to_string());
        }
        self.resolved_video_id()
            .map(|id| format!("{}/{}/hqdefault.jpg", THUMBNAIL_BASE, id))
    }
}

fn is_video_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extracts the id from `watch?v=`, `youtu.be/`, `/embed/` and `/shorts/` URLs.
fn video_id_from_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?;
    let mut segments = parsed.path_segments()?;

    let id = if host == "youtu.be" {
        segments.next().map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        match segments.next() {
            Some("watch") => parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("embed") | Some("shorts") => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    };

    id.filter(|id| is_video_id(id))
}

/// A diagnostic report with its supporting links.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuredPayload {
    /// Free-text report body, rendered to markup by the panel.
    #[serde(rename = "content", default)]
    pub main_content: String,
    #[serde(default)]
    pub web_sources: Vec<WebSource>,
    #[serde(default)]
    pub youtube_videos: Vec<YoutubeVideo>,
}

impl StructuredPayload {
    /// The empty sentinel shown before anything has resolved.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A payload with a body and no links.
    pub fn from_text(main_content: impl Into<String>) -> Self {
        Self {
            main_content: main_content.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.main_content.is_empty() && self.web_sources.is_empty() && self.youtube_videos.is_empty()
    }
}

/// The payload currently held for the report panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticPayload {
    /// A decoded report with optional links.
    Structured(StructuredPayload),
    /// A detail channel that was not JSON, shown verbatim.
    Plain(String),
}

impl DiagnosticPayload {
    pub fn main_content(&self) -> &str {
        match self {
            Self::Structured(payload) => &payload.main_content,
            Self::Plain(text) => text,
        }
    }

    /// Returns the payload as a structured report; plain text has no links.
    pub fn to_structured(&self) -> StructuredPayload {
        match self {
            Self::Structured(payload) => payload.clone(),
            Self::Plain(text) => StructuredPayload::from_text(text.clone()),
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(_))
    }
}
