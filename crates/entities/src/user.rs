//! Session user definitions.

use serde::{Deserialize, Serialize};

/// The display identity attached to a browser session.
///
/// This is not derived from authentication; it comes from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Display name, stored on items as the uploader.
    pub name: String,
    /// Office the user belongs to.
    pub office: String,
}

impl SessionUser {
    /// Creates a new session user.
    pub fn new(name: impl Into<String>, office: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            office: office.into(),
        }
    }
}
