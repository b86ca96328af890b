//! In-memory store implementations for testing and local runs.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use entities::{NewPortalItem, PortalItem};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{public_object_url, BlobStore, DocumentStore, StoreError, StoreResult};

/// In-memory document store.
#[derive(Debug, Default, Clone)]
pub struct MemoryDocumentStore {
    items: Arc<RwLock<HashMap<String, PortalItem>>>,
}

impl MemoryDocumentStore {
    /// Creates a new in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed record as-is, including its ID and timestamp.
    pub async fn insert_item(&self, item: PortalItem) {
        self.items.write().await.insert(item.id.clone(), item);
    }

    /// Returns the number of stored records across all categories.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add_item(&self, item: &NewPortalItem) -> StoreResult<String> {
        item.validate()?;

        let id = Uuid::new_v4().simple().to_string();
        let record = PortalItem {
            id: id.clone(),
            title: item.title.clone(),
            category_id: item.category_id.clone(),
            user_name: item.user_name.clone(),
            file_url: item.file_url.clone(),
            link_url: item.link_url.clone(),
            updated_at: Some(Utc::now()),
        };
        self.items.write().await.insert(id.clone(), record);
        Ok(id)
    }

    async fn list_items(&self, category_id: &str) -> StoreResult<Vec<PortalItem>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| item.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn delete_item(&self, id: &str) -> StoreResult<()> {
        self.items.write().await.remove(id);
        Ok(())
    }
}

/// An object held by [`MemoryBlobStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object contents.
    pub bytes: Vec<u8>,
    /// MIME type given at upload.
    pub content_type: String,
    /// Whether public read access was granted.
    pub public: bool,
}

/// In-memory blob store.
#[derive(Debug, Clone)]
pub struct MemoryBlobStore {
    bucket: String,
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    deny_public_access: bool,
}

impl MemoryBlobStore {
    /// Creates a new in-memory blob store for a bucket name.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::default(),
            deny_public_access: false,
        }
    }

    /// Makes every `make_public` call fail, like a bucket with uniform access.
    pub fn with_public_access_denied(mut self) -> Self {
        self.deny_public_access = true;
        self
    }

    /// Gets a stored object.
    pub async fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    /// Lists stored object paths, sorted.
    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.objects.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<()> {
        let object = StoredObject {
            bytes,
            content_type: content_type.to_string(),
            public: false,
        };
        self.objects.write().await.insert(path.to_string(), object);
        Ok(())
    }

    async fn make_public(&self, path: &str) -> StoreResult<String> {
        if self.deny_public_access {
            return Err(StoreError::api(
                "storage",
                400,
                "Cannot use ACL API to set object policy when uniform bucket-level access is enabled",
            ));
        }

        let mut objects = self.objects.write().await;
        let object = objects
            .get_mut(path)
            .ok_or_else(|| StoreError::api("storage", 404, format!("No such object: {path}")))?;
        object.public = true;
        Ok(self.public_url(path))
    }

    fn public_url(&self, path: &str) -> String {
        public_object_url(&self.bucket, path)
    }
}
