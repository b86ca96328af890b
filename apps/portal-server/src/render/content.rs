//! Content area of the active category.

use entities::{Category, PortalItem};

use super::{escape_html, render_item_row};
use crate::gateway::ALLOWED_UPLOAD_EXTENSIONS;

/// Shown when a category (or a search) has no items.
pub const EMPTY_MESSAGE: &str = "No items yet.";

const FOLDER_ICON: &str = r##"<svg width="22" height="22" viewBox="0 0 24 24" fill="none" stroke="#6366f1" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M22 19a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h5l2 3h9a2 2 0 0 1 2 2z"></path></svg>"##;

/// Keeps items whose title contains `query`, ignoring case.
pub fn filter_by_title<'a>(items: &'a [PortalItem], query: &str) -> Vec<&'a PortalItem> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| needle.is_empty() || item.title.to_lowercase().contains(&needle))
        .collect()
}

/// Renders the header, search box, registration form and item list.
pub fn render_content(category: &Category, items: &[PortalItem], search_query: &str) -> String {
    let visible = filter_by_title(items, search_query);

    let list = if visible.is_empty() {
        format!(r#"<div class="notice info">{EMPTY_MESSAGE}</div>"#)
    } else {
        visible.into_iter().map(render_item_row).collect()
    };

    format!(
        r#"<div class="category-header"><div class="category-badge">{FOLDER_ICON}</div><h1>{label}</h1></div>
<div class="category-rule"></div>
{search}
{form}
<hr>
<section class="items">
{list}</section>
"#,
        label = escape_html(category.label),
        search = render_search(search_query),
        form = render_registration_form(category),
    )
}

fn render_search(search_query: &str) -> String {
    format!(
        r#"<form class="search" method="get" action="/"><input type="search" name="q" value="{}" placeholder="Search by title..."><button type="submit">🔍</button></form>"#,
        escape_html(search_query)
    )
}

/// Renders the collapsible registration form. Only categories accepting
/// links get the URL field.
pub fn render_registration_form(category: &Category) -> String {
    let link_field = if category.accepts_link() {
        r#"<label>Video URL (YouTube or other link)<input type="url" name="link_url" placeholder="https://"></label>
"#
    } else {
        ""
    };

    let accept = ALLOWED_UPLOAD_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        r#"<details class="register"><summary>➕ Register new item</summary>
<form method="post" action="/items" enctype="multipart/form-data">
<label>Title<input type="text" name="title" required></label>
{link_field}<label>File<input type="file" name="file" accept="{accept}"></label>
<button type="submit">Register</button>
</form>
</details>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str) -> PortalItem {
        PortalItem {
            id: id.to_string(),
            title: title.to_string(),
            category_id: "news".to_string(),
            user_name: "Tester".to_string(),
            file_url: None,
            link_url: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let items = vec![item("1", "Monthly Report"), item("2", "Annual plan")];

        let hits = filter_by_title(&items, "report");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        assert_eq!(filter_by_title(&items, "PLAN").len(), 1);
        assert_eq!(filter_by_title(&items, "").len(), 2);
        assert!(filter_by_title(&items, "budget").is_empty());
    }

    #[test]
    fn test_filter_ignores_surrounding_whitespace() {
        let items = vec![item("1", "Monthly Report"), item("2", "Annual plan")];

        assert_eq!(filter_by_title(&items, " month ").len(), 1);
        assert_eq!(filter_by_title(&items, "   ").len(), 2);
    }

    #[test]
    fn test_empty_category_message() {
        let html = render_content(Category::default_category(), &[], "");
        assert!(html.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_search_without_hits_shows_empty_message() {
        let items = vec![item("1", "Monthly Report")];
        let html = render_content(Category::default_category(), &items, "budget");

        assert!(html.contains(EMPTY_MESSAGE));
        assert!(!html.contains("Monthly Report"));
        assert!(html.contains(r#"name="q" value="budget""#));
    }

    #[test]
    fn test_rows_keep_listing_order() {
        let items = vec![item("1", "Newest"), item("2", "Older")];
        let html = render_content(Category::default_category(), &items, "");

        let newest = html.find("Newest").unwrap();
        let older = html.find("Older").unwrap();
        assert!(newest < older);
        assert!(!html.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_link_field_only_for_manuals() {
        let manuals = Category::find("manuals").unwrap();
        assert!(render_registration_form(manuals).contains(r#"name="link_url""#));

        for id in ["news", "cases", "qa"] {
            let category = Category::find(id).unwrap();
            assert!(!render_registration_form(category).contains("link_url"), "{id}");
        }
    }

    #[test]
    fn test_form_accepts_allowed_extensions() {
        let html = render_registration_form(Category::default_category());

        assert!(html.contains(r#"accept=".pdf,.png,.jpg,.xlsx,.docx,.pptx,.mp4""#));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(html.contains(r#"name="title""#));
    }
}
