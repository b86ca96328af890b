//! Portal item entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Category, ValidationError, ValidationResult};

/// A registered document, link or video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalItem {
    /// Identifier assigned by the storage backend.
    pub id: String,
    /// Item title.
    pub title: String,
    /// ID of the category this item belongs to.
    pub category_id: String,
    /// Display name of the uploader.
    pub user_name: String,
    /// Public URL of an uploaded file.
    pub file_url: Option<String>,
    /// External link (manuals only).
    pub link_url: Option<String>,
    /// Server-assigned commit time. `None` until the backend sets it.
    pub updated_at: Option<DateTime<Utc>>,
}

impl PortalItem {
    /// Returns the single actionable URL for this item.
    ///
    /// The file URL wins over the link URL; blank values count as absent.
    pub fn target_url(&self) -> Option<&str> {
        non_blank(self.file_url.as_deref()).or_else(|| non_blank(self.link_url.as_deref()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Checks that `id` names exactly one item document.
///
/// Backend IDs only use `[A-Za-z0-9_-]`, so path separators, dot segments,
/// query and fragment markers are all rejected.
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidItemId(id.to_string()))
    }
}

/// Write-side record for a new portal item.
///
/// The ID and timestamp are assigned by the backend on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortalItem {
    /// Item title.
    pub title: String,
    /// ID of the category this item belongs to.
    pub category_id: String,
    /// Display name of the uploader.
    pub user_name: String,
    /// Public URL of an uploaded file.
    pub file_url: Option<String>,
    /// External link (manuals only).
    pub link_url: Option<String>,
}

impl NewPortalItem {
    /// Creates a new item without any target URL.
    pub fn new(
        title: impl Into<String>,
        category_id: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            category_id: category_id.into(),
            user_name: user_name.into(),
            file_url: None,
            link_url: None,
        }
    }

    /// Sets the uploaded file URL.
    pub fn with_file_url(mut self, file_url: Option<String>) -> Self {
        self.file_url = file_url;
        self
    }

    /// Sets the external link URL.
    pub fn with_link_url(mut self, link_url: Option<String>) -> Self {
        self.link_url = link_url;
        self
    }

    /// Checks the record before it is persisted.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let category = Category::find(&self.category_id)
            .ok_or_else(|| ValidationError::UnknownCategory(self.category_id.clone()))?;

        if matches!(&self.file_url, Some(url) if url.trim().is_empty()) {
            return Err(ValidationError::BlankUrl("fileUrl"));
        }

        match &self.link_url {
            Some(url) if url.trim().is_empty() => Err(ValidationError::BlankUrl("linkUrl")),
            Some(_) if !category.accepts_link() => {
                Err(ValidationError::LinkNotAccepted(category.id.to_string()))
            }
            _ => Ok(()),
        }
    }
}
