//! Report body to display markup.
//!
//! The report body is loosely Markdown-shaped text produced by the model.
//! [`render_markup`] runs a fixed sequence of passes over it, each taking
//! the previous pass's output and returning new text:
//!
//! 1. normalize `\r\n` to `\n`
//! 2. escape HTML metacharacters
//! 3. header lines: `**Label:**` alone on a line
//! 4. callout lines: `**Category:** text`
//! 5. bullet lines: `• text`
//! 6. paragraph breaks: `\n\n`
//! 7. line breaks: remaining `\n`
//!
//! Line-level passes (3–5) must run before the newline passes, which erase
//! the line structure they rely on.

use dxvoice_types::{DiagnosticPayload, WebSource};
use serde::Serialize;

const PARAGRAPH_BREAK: &str = r#"<div class="report-paragraph-break"></div>"#;
const LINE_BREAK: &str = "<br/>";
const BULLET: &str = "• ";

/// Labels rendered as a highlighted callout when followed by text.
const CALLOUT_LABELS: &[&str] = &["Category"];

/// Renders a report body as display markup.
pub fn render_markup(text: &str) -> String {
    let normalized = normalize_newlines(text);
    let escaped = escape_html(&normalized);
    let headed = render_headers(&escaped);
    let called_out = render_callouts(&headed);
    let listed = render_bullets(&called_out);
    let paragraphs = render_paragraph_breaks(&listed);
    render_line_breaks(&paragraphs)
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Applies `f` to every line, keeping lines it declines.
fn map_lines(text: &str, f: impl Fn(&str) -> Option<String>) -> String {
    text.split('\n')
        .map(|line| f(line).unwrap_or_else(|| line.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_headers(text: &str) -> String {
    map_lines(text, |line| {
        let label = line
            .trim()
            .strip_prefix("**")?
            .strip_suffix(":**")?
            .trim();
        if label.is_empty() || label.contains("**") {
            return None;
        }
        Some(format!(r#"<h4 class="report-header">{}</h4>"#, label))
    })
}

fn render_callouts(text: &str) -> String {
    map_lines(text, |line| {
        let trimmed = line.trim_start();
        CALLOUT_LABELS.iter().find_map(|label| {
            let rest = trimmed
                .strip_prefix("**")?
                .strip_prefix(label)?
                .strip_prefix(":**")?;
            Some(format!(
                r#"<div class="report-callout"><span class="report-callout-label">{}:</span> {}</div>"#,
                label,
                rest.trim()
            ))
        })
    })
}

fn render_bullets(text: &str) -> String {
    map_lines(text, |line| {
        let item = line.strip_prefix(BULLET)?;
        Some(format!(
            r#"<div class="report-bullet"><span class="report-bullet-marker">•</span><span>{}</span></div>"#,
            item.trim_end()
        ))
    })
}

fn render_paragraph_breaks(text: &str) -> String {
    text.replace("\n\n", PARAGRAPH_BREAK)
}

fn render_line_breaks(text: &str) -> String {
    text.replace('\n', LINE_BREAK)
}

/// A video link prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoCard {
    pub title: String,
    pub url: String,
    pub thumbnail: Option<String>,
}

/// Everything the report panel displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    /// Rendered report body.
    pub markup: String,
    /// `true` when the payload was an unstructured detail channel.
    pub plain: bool,
    pub web_sources: Vec<WebSource>,
    pub videos: Vec<VideoCard>,
}

/// Renders a payload for the report panel.
pub fn render_panel(payload: &DiagnosticPayload) -> PanelView {
    let structured = payload.to_structured();
    let videos = structured
        .youtube_videos
        .iter()
        .map(|video| VideoCard {
            title: video.title.clone(),
            url: video.url.clone(),
            thumbnail: video.thumbnail_url(),
        })
        .collect();

    PanelView {
        markup: render_markup(&structured.main_content),
        plain: payload.is_plain(),
        web_sources: structured.web_sources,
        videos,
    }
}
