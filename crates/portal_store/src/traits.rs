//! Store trait definitions.

use async_trait::async_trait;
use entities::{NewPortalItem, PortalItem};

use crate::StoreResult;

/// Host serving publicly readable Cloud Storage objects.
pub const PUBLIC_STORAGE_HOST: &str = "https://storage.googleapis.com";

/// Trait for portal item storage operations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new item and returns the backend-assigned ID.
    ///
    /// The backend stamps `updatedAt` with its own clock.
    async fn add_item(&self, item: &NewPortalItem) -> StoreResult<String>;

    /// Lists every item in a category, in no particular order.
    async fn list_items(&self, category_id: &str) -> StoreResult<Vec<PortalItem>>;

    /// Deletes an item. Deleting an unknown ID succeeds.
    async fn delete_item(&self, id: &str) -> StoreResult<()>;
}

/// Trait for uploaded-file storage operations.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes an object.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<()>;

    /// Grants public read access to an object and returns its public URL.
    async fn make_public(&self, path: &str) -> StoreResult<String>;

    /// Returns the URL an object has once it is publicly readable.
    fn public_url(&self, path: &str) -> String;
}

/// Builds the public URL of an object by convention.
pub fn public_object_url(bucket: &str, path: &str) -> String {
    let encoded: Vec<_> = path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{PUBLIC_STORAGE_HOST}/{bucket}/{}", encoded.join("/"))
}
