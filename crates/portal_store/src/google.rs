//! Google Cloud backend wiring.

use std::sync::Arc;

use secrets::ServiceAccountKey;

use crate::{CloudStorageBlobStore, FirestoreDocumentStore, StoreResult, TokenProvider};

/// Settings identifying the project, collection root and bucket.
#[derive(Debug, Clone)]
pub struct GoogleCloudSettings {
    /// Cloud project ID.
    pub project_id: String,
    /// Application ID scoping the items collection.
    pub app_id: String,
    /// Bucket receiving uploads.
    pub bucket: String,
    /// Firestore endpoint override, e.g. an emulator.
    pub firestore_api_url: Option<String>,
    /// Cloud Storage endpoint override, e.g. an emulator.
    pub storage_api_url: Option<String>,
}

/// Firestore and Cloud Storage clients sharing one HTTP client and token cache.
#[derive(Debug, Clone)]
pub struct GoogleBackend {
    /// Document store.
    pub documents: FirestoreDocumentStore,
    /// Blob store.
    pub blobs: CloudStorageBlobStore,
}

impl GoogleBackend {
    /// Builds both clients from a service-account key.
    ///
    /// No network call is made here; the first token is fetched lazily.
    pub fn connect(key: ServiceAccountKey, settings: &GoogleCloudSettings) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("portal-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let tokens = Arc::new(TokenProvider::new(key, http.clone())?);

        tracing::info!(
            project_id = %settings.project_id,
            bucket = %settings.bucket,
            "Google Cloud backend configured"
        );

        let mut documents = FirestoreDocumentStore::new(
            http.clone(),
            tokens.clone(),
            &settings.project_id,
            &settings.app_id,
        );
        if let Some(url) = &settings.firestore_api_url {
            tracing::info!(api_url = %url, "Using Firestore endpoint override");
            documents = documents.with_api_url(url.as_str());
        }

        let mut blobs = CloudStorageBlobStore::new(http, tokens, &settings.bucket);
        if let Some(url) = &settings.storage_api_url {
            tracing::info!(api_url = %url, "Using Cloud Storage endpoint override");
            blobs = blobs.with_api_url(url.as_str());
        }

        Ok(Self { documents, blobs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth_token::tests::test_key, BlobStore};

    #[test]
    fn test_connect_wires_settings() {
        let settings = GoogleCloudSettings {
            project_id: "demo-project".to_string(),
            app_id: "demo-app".to_string(),
            bucket: "demo-bucket".to_string(),
            firestore_api_url: None,
            storage_api_url: None,
        };
        let backend = GoogleBackend::connect(test_key(), &settings).unwrap();

        assert_eq!(backend.documents.api_url(), crate::FIRESTORE_API_URL);
        assert_eq!(backend.blobs.api_url(), crate::STORAGE_API_URL);

        assert_eq!(backend.blobs.bucket(), "demo-bucket");
        assert!(backend
            .documents
            .collection_parent()
            .contains("projects/demo-project/"));
        assert!(backend
            .blobs
            .public_url("portal/qa/x.png")
            .starts_with("https://storage.googleapis.com/demo-bucket/"));
    }

    #[test]
    fn test_connect_applies_endpoint_overrides() {
        let settings = GoogleCloudSettings {
            project_id: "demo-project".to_string(),
            app_id: "demo-app".to_string(),
            bucket: "demo-bucket".to_string(),
            firestore_api_url: Some("http://localhost:8080/v1".to_string()),
            storage_api_url: Some("http://localhost:9199".to_string()),
        };
        let backend = GoogleBackend::connect(test_key(), &settings).unwrap();

        assert_eq!(backend.documents.api_url(), "http://localhost:8080/v1");
        assert_eq!(backend.blobs.api_url(), "http://localhost:9199");
        // Public links keep pointing at the real host.
        assert!(backend
            .blobs
            .public_url("portal/qa/x.png")
            .starts_with("https://storage.googleapis.com/demo-bucket/"));
    }
}
