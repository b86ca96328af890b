//! Portal data gateway.
//!
//! The gateway is the only component talking to the storage backend. Reads
//! never fail the caller: errors are downgraded to an empty listing with a
//! warning. Writes propagate their errors.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use entities::{NewPortalItem, PortalItem, ValidationError, validate_item_id};
use portal_store::{
    BlobStore, DocumentStore, GoogleBackend, MemoryBlobStore, MemoryDocumentStore, StoreError,
};
use secrets::{CredentialSource, SecretStore, TomlSecretStore, load_credentials};

use crate::config::{BackendKind, Config};

/// File extensions accepted for upload.
pub const ALLOWED_UPLOAD_EXTENSIONS: [&str; 7] = ["pdf", "png", "jpg", "xlsx", "docx", "pptx", "mp4"];

/// Content type used when the browser does not send one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Gateway error type.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No backend is configured; writes are skipped.
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    /// Record failed validation.
    #[error("Invalid item: {0}")]
    Validation(#[from] ValidationError),

    /// File type not on the allow-list.
    #[error("File type not allowed: {0}")]
    DisallowedFile(String),

    /// Backend error.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Items of one category plus an optional non-fatal warning.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Items, newest first.
    pub items: Vec<PortalItem>,
    /// Set when the backend read failed.
    pub warning: Option<String>,
}

/// A file received from the registration form.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Client-side file name.
    pub file_name: String,
    /// MIME type reported by the browser.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Object path inside the bucket.
    pub path: String,
    /// URL stored on the item.
    pub url: String,
    /// Set when public access could not be granted and the URL was guessed.
    pub warning: Option<String>,
}

#[derive(Clone)]
struct Backend {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

/// Data-access layer over the document and blob stores.
pub struct PortalGateway {
    backend: Option<Backend>,
    connection_error: Option<String>,
}

impl std::fmt::Debug for PortalGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalGateway")
            .field("available", &self.backend.is_some())
            .field("connection_error", &self.connection_error)
            .finish()
    }
}

impl PortalGateway {
    /// Creates a gateway over the given stores.
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            backend: Some(Backend { documents, blobs }),
            connection_error: None,
        }
    }

    /// Creates a gateway with no backend. Reads return nothing and writes fail.
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            backend: None,
            connection_error: Some(reason.into()),
        }
    }

    /// Builds the gateway selected by the configuration.
    ///
    /// Credential or client errors do not abort startup; they put the
    /// gateway in degraded mode.
    pub fn connect(config: &Config) -> Self {
        match config.backend {
            BackendKind::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Self::new(
                    Arc::new(MemoryDocumentStore::new()),
                    Arc::new(MemoryBlobStore::new(&config.bucket)),
                )
            }
            BackendKind::Google => match connect_google(config) {
                Ok(gateway) => gateway,
                Err(e) => {
                    let reason = format!("{e:#}");
                    tracing::error!(error = %reason, "Backend connection failed; running degraded");
                    Self::degraded(reason)
                }
            },
        }
    }

    /// Returns the connection error when running degraded.
    pub fn connection_error(&self) -> Option<&str> {
        self.connection_error.as_deref()
    }

    fn backend(&self) -> GatewayResult<&Backend> {
        self.backend.as_ref().ok_or_else(|| {
            GatewayError::Unavailable(
                self.connection_error
                    .clone()
                    .unwrap_or_else(|| "no backend configured".to_string()),
            )
        })
    }

    /// Lists a category's items, newest first.
    pub async fn list_items(&self, category_id: &str) -> Listing {
        let Some(backend) = &self.backend else {
            return Listing::default();
        };

        match backend.documents.list_items(category_id).await {
            Ok(mut items) => {
                sort_newest_first(&mut items);
                Listing {
                    items,
                    warning: None,
                }
            }
            Err(e) => {
                tracing::warn!(category_id = %category_id, error = %e, "Failed to list items");
                Listing {
                    items: Vec::new(),
                    warning: Some(format!("An error occurred while loading data: {e}")),
                }
            }
        }
    }

    /// Stores an uploaded file and returns the URL to record on the item.
    pub async fn upload_file(
        &self,
        upload: FileUpload,
        category_id: &str,
    ) -> GatewayResult<UploadedFile> {
        let backend = self.backend()?;

        let file_name = base_file_name(&upload.file_name);
        if !is_allowed_upload(file_name) {
            return Err(GatewayError::DisallowedFile(file_name.to_string()));
        }

        let path = object_path(category_id, file_name, Utc::now());
        let content_type = if upload.content_type.trim().is_empty() {
            FALLBACK_CONTENT_TYPE
        } else {
            upload.content_type.as_str()
        };

        backend.blobs.upload(&path, upload.bytes, content_type).await?;

        let uploaded = match backend.blobs.make_public(&path).await {
            Ok(url) => UploadedFile {
                path,
                url,
                warning: None,
            },
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Could not make object public; using conventional URL");
                UploadedFile {
                    url: backend.blobs.public_url(&path),
                    path,
                    warning: Some(format!(
                        "The file was saved but could not be made public ({e}); its link only works if the bucket is publicly readable."
                    )),
                }
            }
        };

        tracing::info!(path = %uploaded.path, "File uploaded");
        Ok(uploaded)
    }

    /// Inserts an item. The backend assigns its ID and timestamp.
    pub async fn create_item(&self, item: NewPortalItem) -> GatewayResult<()> {
        item.validate()?;
        let backend = self.backend()?;

        let id = backend.documents.add_item(&item).await?;
        tracing::info!(item_id = %id, category_id = %item.category_id, "Item created");
        Ok(())
    }

    /// Deletes an item. Unknown IDs are ignored; malformed IDs are rejected.
    pub async fn delete_item(&self, id: &str) -> GatewayResult<()> {
        validate_item_id(id)?;
        let backend = self.backend()?;

        backend.documents.delete_item(id).await?;
        tracing::info!(item_id = %id, "Item deleted");
        Ok(())
    }
}

fn connect_google(config: &Config) -> anyhow::Result<PortalGateway> {
    let secret_store = TomlSecretStore::load(&config.secrets_path)
        .with_context(|| format!("reading {}", config.secrets_path.display()))?;

    let credentials = load_credentials(
        secret_store.as_ref().map(|s| s as &dyn SecretStore),
        &config.key_path,
    )
    .context("loading service-account credentials")?
    .ok_or_else(|| {
        anyhow::anyhow!(
            "no credentials found in {} or {}",
            config.secrets_path.display(),
            config.key_path.display()
        )
    })?;

    let source = match &credentials.source {
        CredentialSource::SecretStore => config.secrets_path.display().to_string(),
        CredentialSource::KeyFile(path) => path.display().to_string(),
    };
    tracing::info!(
        source = %source,
        client_email = %credentials.key.client_email,
        "Using service-account credentials"
    );

    let backend = GoogleBackend::connect(credentials.key, &config.google_settings())
        .context("creating Google Cloud clients")?;

    Ok(PortalGateway::new(
        Arc::new(backend.documents),
        Arc::new(backend.blobs),
    ))
}

/// Orders items newest first. Items without a timestamp sort last.
pub fn sort_newest_first(items: &mut [PortalItem]) {
    items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Builds the bucket path for an upload: `portal/<category>/<timestamp>_<name>`.
pub fn object_path(category_id: &str, file_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "portal/{category_id}/{}_{file_name}",
        now.format("%Y%m%d%H%M%S")
    )
}

/// Strips any directory part a browser may have sent with the file name.
fn base_file_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim()
}

/// Returns true if the file name has an allowed extension.
pub fn is_allowed_upload(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_UPLOAD_EXTENSIONS.contains(&ext.as_str()))
}
