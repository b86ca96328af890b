//! HTML rendering.
//!
//! Pages are plain server-rendered HTML. Every value that came from a user or
//! the backend goes through [`escape_html`].

pub mod content;
pub mod item_row;
pub mod sidebar;

use axum::http::StatusCode;
use entities::{Category, SessionUser};

use crate::gateway::Listing;
use crate::session::{Notice, NoticeLevel};

pub use content::{filter_by_title, render_content};
pub use item_row::{ItemIcon, render_item_row};
pub use sidebar::render_sidebar;

/// Page title.
pub const PAGE_TITLE: &str = "RI2MAPS Portal";

const STYLE: &str = r#"
body { margin: 0; display: flex; min-height: 100vh; font-family: "Segoe UI", "Hiragino Sans", sans-serif; color: #1f2937; background: #ffffff; }
.sidebar { width: 260px; flex-shrink: 0; padding: 24px 16px; background: #f3f4f6; border-right: 1px solid #e5e7eb; }
.sidebar h3 { margin: 0 0 4px 0; font-size: 1.05rem; }
.sidebar .office { margin: 0; color: #6b7280; font-size: 0.85rem; }
.sidebar form { margin: 0 0 6px 0; }
.menu-item { width: 100%; text-align: left; padding: 10px 12px; border: 1px solid transparent; border-radius: 8px; background: transparent; font-size: 0.95rem; cursor: pointer; }
.menu-item:hover { background: #e5e7eb; }
.menu-item.active { background: #ffffff; border-color: #d1d5db; font-weight: 600; }
main { flex: 1; padding: 32px 48px; max-width: 1100px; }
.category-header { display: flex; align-items: center; gap: 12px; }
.category-badge { width: 40px; height: 40px; border-radius: 10px; background: #eef2ff; display: flex; align-items: center; justify-content: center; }
.category-header h1 { margin: 0; font-size: 1.6rem; }
.category-rule { height: 3px; margin: 12px 0 20px 0; background: linear-gradient(90deg, #6366f1, #ffffff); }
.search { display: flex; gap: 8px; margin-bottom: 16px; }
.search input { flex: 1; padding: 8px 10px; border: 1px solid #d1d5db; border-radius: 6px; }
.register { margin-bottom: 16px; padding: 12px 16px; border: 1px solid #e5e7eb; border-radius: 8px; }
.register form { display: grid; gap: 10px; margin-top: 12px; }
.register label { display: grid; gap: 4px; font-size: 0.9rem; }
.item-row { display: grid; grid-template-columns: 6fr 2fr 1.5fr 1fr; align-items: center; gap: 8px; }
.item-date small { color: #6b7280; }
.item-delete { margin: 0; }
.item-delete button { border: none; background: transparent; cursor: pointer; }
.button { display: inline-block; padding: 4px 12px; border: 1px solid #d1d5db; border-radius: 6px; text-decoration: none; color: inherit; }
.preview { margin: 8px 0; }
.player { width: 100%; aspect-ratio: 16 / 9; border: none; }
.caption { color: #6b7280; font-size: 0.8rem; }
.notice { margin-bottom: 12px; padding: 10px 14px; border-radius: 6px; }
.notice.success { background: #ecfdf5; color: #065f46; }
.notice.warning { background: #fffbeb; color: #92400e; }
.notice.error { background: #fef2f2; color: #991b1b; }
.notice.info { background: #eff6ff; color: #1e40af; }
hr { border: none; border-top: 1px solid #e5e7eb; }
"#;

/// Everything needed to draw the portal page for one session.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    /// Display identity.
    pub user: &'a SessionUser,
    /// Active category.
    pub category: &'a Category,
    /// Current title search.
    pub search_query: &'a str,
    /// Items of the active category.
    pub listing: &'a Listing,
    /// One-shot notices.
    pub notices: &'a [Notice],
    /// Set when the backend could not be reached at startup.
    pub connection_error: Option<&'a str>,
}

/// Escapes text for use in HTML content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders a notice box.
pub fn render_notice(notice: &Notice) -> String {
    let class = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!(
        r#"<div class="notice {class}">{}</div>"#,
        escape_html(&notice.message)
    )
}

/// Renders the full portal page.
pub fn render_page(view: &PageView<'_>) -> String {
    let mut banners = String::new();
    if let Some(reason) = view.connection_error {
        banners.push_str(&render_notice(&Notice::error(format!(
            "Backend connection error: {reason}"
        ))));
    }
    if let Some(warning) = &view.listing.warning {
        banners.push_str(&render_notice(&Notice::warning(warning.as_str())));
    }
    for notice in view.notices {
        banners.push_str(&render_notice(notice));
    }

    let sidebar = render_sidebar(view.user, view.category);
    let content = render_content(view.category, &view.listing.items, view.search_query);

    layout(PAGE_TITLE, &format!("{sidebar}\n<main>\n{banners}\n{content}</main>"))
}

/// Renders a minimal page for a failed request.
pub fn render_error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<main>
<h1>{status}</h1>
<div class="notice error">{}</div>
<p><a class="button" href="/">Back to portal</a></p>
</main>"#,
        escape_html(message)
    );
    layout(PAGE_TITLE, &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        escape_html(title)
    )
}
