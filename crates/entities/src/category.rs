//! Category definitions.
//!
//! Categories are a fixed, ordered set compiled into the binary. Items refer
//! to them by ID.

use serde::Serialize;

/// A fixed content bucket that items belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Stable identifier stored on items.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Menu glyph.
    pub icon: &'static str,
}

/// ID of the category that accepts external link URLs.
pub const MANUALS_CATEGORY_ID: &str = "manuals";

/// All categories, in menu order.
pub const CATEGORIES: [Category; 4] = [
    Category {
        id: "news",
        label: "What's New",
        icon: "🔔",
    },
    Category {
        id: MANUALS_CATEGORY_ID,
        label: "Manual Videos",
        icon: "🎥",
    },
    Category {
        id: "cases",
        label: "RI2MAPS Use Cases",
        icon: "💡",
    },
    Category {
        id: "qa",
        label: "Q&A",
        icon: "💬",
    },
];

impl Category {
    /// Looks up a category by ID.
    pub fn find(id: &str) -> Option<&'static Category> {
        CATEGORIES.iter().find(|c| c.id == id)
    }

    /// The category a new session starts on.
    pub fn default_category() -> &'static Category {
        &CATEGORIES[0]
    }

    /// Returns all categories in menu order.
    pub fn all() -> &'static [Category] {
        &CATEGORIES
    }

    /// Returns true if items in this category may carry an external link.
    pub fn accepts_link(&self) -> bool {
        self.id == MANUALS_CATEGORY_ID
    }
}
