//! Cloud Storage blob store (JSON API v1).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;

use crate::{ensure_success, public_object_url, BlobStore, StoreResult, TokenProvider};

/// Cloud Storage JSON API endpoint.
pub const STORAGE_API_URL: &str = "https://storage.googleapis.com";

/// Blob store backed by a Cloud Storage bucket.
#[derive(Debug, Clone)]
pub struct CloudStorageBlobStore {
    http: reqwest::Client,
    tokens: Arc<TokenProvider>,
    api_url: String,
    bucket: String,
}

impl CloudStorageBlobStore {
    /// Creates a new Cloud Storage store for a bucket.
    pub fn new(http: reqwest::Client, tokens: Arc<TokenProvider>, bucket: impl Into<String>) -> Self {
        Self {
            http,
            tokens,
            api_url: STORAGE_API_URL.to_string(),
            bucket: bucket.into(),
        }
    }

    /// Overrides the API endpoint, e.g. to target an emulator.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Returns the API endpoint in use.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/storage/v1/b/{}/o", self.api_url, self.bucket)
    }

    fn acl_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}/acl",
            self.api_url,
            self.bucket,
            urlencoding::encode(path)
        )
    }
}

#[async_trait]
impl BlobStore for CloudStorageBlobStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<()> {
        let token = self.tokens.access_token().await?;
        let size = bytes.len();

        let response = self
            .http
            .post(self.upload_url())
            .query(&[("uploadType", "media"), ("name", path)])
            .bearer_auth(token)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        ensure_success("storage", response).await?;

        tracing::debug!(bucket = %self.bucket, path = %path, size, "Object uploaded");
        Ok(())
    }

    async fn make_public(&self, path: &str) -> StoreResult<String> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(self.acl_url(path))
            .bearer_auth(token)
            .json(&json!({ "entity": "allUsers", "role": "READER" }))
            .send()
            .await?;
        ensure_success("storage", response).await?;

        Ok(self.public_url(path))
    }

    fn public_url(&self, path: &str) -> String {
        public_object_url(&self.bucket, path)
    }
}
