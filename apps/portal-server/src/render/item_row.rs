//! Item rows and video previews.

use chrono::{DateTime, Utc};
use entities::PortalItem;
use url::Url;

use super::escape_html;

/// Shown instead of a date when the backend has not stamped the item yet.
pub const MISSING_DATE: &str = "---";

/// Substrings marking a target as a video.
const VIDEO_MARKERS: [&str; 4] = [".mp4", "firebasestorage", "youtube", "youtu.be"];

/// Icon shown in front of an item title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemIcon {
    /// PDF document.
    Pdf,
    /// Excel workbook.
    Spreadsheet,
    /// Playable video.
    Video,
    /// Anything else, including items without a target.
    Document,
}

impl ItemIcon {
    /// Picks the icon for a target URL.
    pub fn for_target(target: Option<&str>) -> Self {
        let Some(target) = target else {
            return Self::Document;
        };
        let lower = target.to_lowercase();

        if lower.contains(".pdf") {
            Self::Pdf
        } else if lower.contains(".xls") {
            Self::Spreadsheet
        } else if VIDEO_MARKERS.iter().any(|marker| lower.contains(marker)) {
            Self::Video
        } else {
            Self::Document
        }
    }

    /// Glyph rendered for this icon.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Pdf => "📕",
            Self::Spreadsheet => "📗",
            Self::Video => "🎥",
            Self::Document => "📄",
        }
    }

    /// Returns true if the item gets an inline preview.
    pub fn is_video(self) -> bool {
        self == Self::Video
    }
}

/// Formats the update date as `YYYY/MM/DD`.
pub fn format_updated_at(updated_at: Option<DateTime<Utc>>) -> String {
    updated_at
        .map(|ts| ts.format("%Y/%m/%d").to_string())
        .unwrap_or_else(|| MISSING_DATE.to_string())
}

/// Renders one item row, plus its preview panel for videos.
pub fn render_item_row(item: &PortalItem) -> String {
    let target = item.target_url();
    let icon = ItemIcon::for_target(target);
    let title = if item.title.trim().is_empty() {
        "Untitled"
    } else {
        item.title.as_str()
    };

    let open = target
        .map(|url| {
            format!(
                r#"<a class="button" href="{}" target="_blank" rel="noopener">Open</a>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let preview = match target {
        Some(url) if icon.is_video() => format!(
            r#"<details class="preview"><summary>▶️ Show video preview</summary>{}</details>"#,
            render_preview(url)
        ),
        _ => String::new(),
    };

    format!(
        r#"<div class="item-row" data-item-id="{id}">
<div class="item-title">{glyph} <strong>{title}</strong></div>
<div class="item-date"><small>{date}</small></div>
<div class="item-open">{open}</div>
<form class="item-delete" method="post" action="/items/delete"><input type="hidden" name="id" value="{id}"><button type="submit" title="Delete">🗑️</button></form>
</div>
{preview}<hr>
"#,
        id = escape_html(&item.id),
        glyph = icon.glyph(),
        title = escape_html(title),
        date = format_updated_at(item.updated_at),
    )
}

/// Renders the player for a video target, or an error for a malformed URL.
pub fn render_preview(target: &str) -> String {
    let Some(url) = playable_url(target) else {
        return r#"<div class="notice error">The URL format is invalid. Register a URL starting with https://.</div>"#
            .to_string();
    };

    let player = match youtube_embed_url(&url) {
        Some(embed) => format!(
            r#"<iframe class="player" src="{}" allow="encrypted-media; picture-in-picture" allowfullscreen></iframe>"#,
            escape_html(&embed)
        ),
        None => format!(
            r#"<video class="player" controls preload="metadata" src="{}"></video>"#,
            escape_html(url.as_str())
        ),
    };

    format!(
        r#"{player}<p class="caption">If the video does not play, open it directly with the "Open" button.</p>"#
    )
}

/// Parses a target as an http(s) URL.
fn playable_url(target: &str) -> Option<Url> {
    Url::parse(target.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Maps YouTube watch/short links to their embeddable form.
fn youtube_embed_url(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let mut segments = url.path_segments()?;

    let video_id = match host {
        "youtu.be" => segments.next().map(String::from),
        "youtube.com" | "youtube-nocookie.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("embed" | "shorts" | "live") => segments.next().map(String::from),
            _ => None,
        },
        _ => None,
    }?;

    if video_id.is_empty() {
        return None;
    }
    Some(format!("https://www.youtube.com/embed/{video_id}"))
}
