//! Sidebar: session identity and the category menu.

use entities::{Category, SessionUser};

use super::escape_html;

/// Prefix marking the active menu entry.
pub const ACTIVE_MARKER: &str = "▶️ ";

/// Renders the sidebar. Each menu entry posts its category to `/navigate`.
pub fn render_sidebar(user: &SessionUser, active: &Category) -> String {
    let menu: String = Category::all()
        .iter()
        .map(|category| menu_entry(category, category.id == active.id))
        .collect();

    format!(
        r#"<aside class="sidebar">
<h3>👤 {name}</h3>
<p class="office">{office}</p>
<hr>
<nav>
{menu}</nav>
</aside>"#,
        name = escape_html(&user.name),
        office = escape_html(&user.office),
    )
}

fn menu_entry(category: &Category, active: bool) -> String {
    let (class, marker) = if active {
        ("menu-item active", ACTIVE_MARKER)
    } else {
        ("menu-item", "")
    };

    format!(
        r#"<form method="post" action="/navigate"><input type="hidden" name="category" value="{id}"><button class="{class}" type="submit">{marker}{icon} {label}</button></form>
"#,
        id = escape_html(category.id),
        icon = category.icon,
        label = escape_html(category.label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser::new("Tester", "Head Office")
    }

    #[test]
    fn test_menu_lists_categories_in_order() {
        let html = render_sidebar(&user(), Category::default_category());

        let positions: Vec<usize> = Category::all()
            .iter()
            .map(|c| html.find(&format!(r#"value="{}""#, c.id)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(html.matches(r#"action="/navigate""#).count(), 4);
    }

    #[test]
    fn test_only_active_entry_is_marked() {
        let qa = Category::find("qa").unwrap();
        let html = render_sidebar(&user(), qa);

        assert_eq!(html.matches(ACTIVE_MARKER).count(), 1);
        assert!(html.contains("▶️ 💬 Q&amp;A"));
        assert!(html.contains("🔔 What&#39;s New"));
    }

    #[test]
    fn test_shows_user_identity() {
        let html = render_sidebar(&SessionUser::new("<b>Eve</b>", "Branch"), Category::default_category());

        assert!(html.contains("👤 &lt;b&gt;Eve&lt;/b&gt;"));
        assert!(html.contains("Branch"));
    }
}
