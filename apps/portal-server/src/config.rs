//! Server configuration.

use std::{env, path::PathBuf};

use entities::SessionUser;
use portal_store::GoogleCloudSettings;

/// Default cloud project.
pub const DEFAULT_PROJECT_ID: &str = "mybulletinboard-6e716";

/// Default upload bucket.
pub const DEFAULT_BUCKET: &str = "mybulletinboard-6e716.firebasestorage.app";

/// Default upload limit, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;

const BYTES_PER_MB: usize = 1024 * 1024;

/// Which storage backend the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Firestore and Cloud Storage, using service-account credentials.
    Google,
    /// Process-local in-memory stores.
    Memory,
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "firebase" => Ok(Self::Google),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("Unknown PORTAL_BACKEND: {other}"),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Log level.
    pub log_level: String,
    /// Storage backend.
    pub backend: BackendKind,
    /// Cloud project ID.
    pub project_id: String,
    /// Application ID scoping the items collection.
    pub app_id: String,
    /// Upload bucket.
    pub bucket: String,
    /// Secrets store file.
    pub secrets_path: PathBuf,
    /// Fallback service-account key file.
    pub key_path: PathBuf,
    /// Display name given to every session.
    pub user_name: String,
    /// Office given to every session.
    pub user_office: String,
    /// Maximum accepted request body for uploads, in bytes.
    pub max_upload_bytes: usize,
    /// Firestore endpoint override, e.g. an emulator.
    pub firestore_api_url: Option<String>,
    /// Cloud Storage endpoint override, e.g. an emulator.
    pub storage_api_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            log_level: "info".to_string(),
            backend: BackendKind::Google,
            project_id: DEFAULT_PROJECT_ID.to_string(),
            app_id: DEFAULT_PROJECT_ID.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            secrets_path: PathBuf::from(".portal/secrets.toml"),
            key_path: PathBuf::from("service-account.json"),
            user_name: "Portal User".to_string(),
            user_office: "Head Office".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * BYTES_PER_MB,
            firestore_api_url: None,
            storage_api_url: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let backend = match env::var("PORTAL_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.backend,
        };

        let max_upload_bytes = upload_limit_bytes(env::var("PORTAL_MAX_UPLOAD_MB").ok().as_deref())?;

        Ok(Self {
            host: env::var("PORTAL_HOST").unwrap_or(defaults.host),
            port: env::var("PORTAL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            log_level: env::var("PORTAL_LOG_LEVEL").unwrap_or(defaults.log_level),
            backend,
            project_id: env::var("PORTAL_PROJECT_ID").unwrap_or(defaults.project_id),
            app_id: env::var("PORTAL_APP_ID").unwrap_or(defaults.app_id),
            bucket: env::var("PORTAL_BUCKET").unwrap_or(defaults.bucket),
            secrets_path: env::var("PORTAL_SECRETS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.secrets_path),
            key_path: env::var("PORTAL_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.key_path),
            user_name: env::var("PORTAL_USER_NAME").unwrap_or(defaults.user_name),
            user_office: env::var("PORTAL_USER_OFFICE").unwrap_or(defaults.user_office),
            max_upload_bytes,
            firestore_api_url: non_empty_var("PORTAL_FIRESTORE_API_URL"),
            storage_api_url: non_empty_var("PORTAL_STORAGE_API_URL"),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the identity new sessions start with.
    pub fn session_user(&self) -> SessionUser {
        SessionUser::new(&self.user_name, &self.user_office)
    }

    /// Returns the Google Cloud identifiers.
    pub fn google_settings(&self) -> GoogleCloudSettings {
        GoogleCloudSettings {
            project_id: self.project_id.clone(),
            app_id: self.app_id.clone(),
            bucket: self.bucket.clone(),
            firestore_api_url: self.firestore_api_url.clone(),
            storage_api_url: self.storage_api_url.clone(),
        }
    }
}

/// Converts `PORTAL_MAX_UPLOAD_MB` to bytes. Absent means the default.
fn upload_limit_bytes(raw: Option<&str>) -> anyhow::Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_MAX_UPLOAD_MB * BYTES_PER_MB);
    };

    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(|mb| mb.checked_mul(BYTES_PER_MB))
        .ok_or_else(|| anyhow::anyhow!("PORTAL_MAX_UPLOAD_MB must be a number of megabytes"))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert_eq!("Google".parse::<BackendKind>().unwrap(), BackendKind::Google);
        assert_eq!("firebase".parse::<BackendKind>().unwrap(), BackendKind::Google);
        assert!("postgres".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.server_addr(), "0.0.0.0:8501");
        assert_eq!(config.backend, BackendKind::Google);
        assert_eq!(config.max_upload_bytes, 200 * 1024 * 1024);
        assert_eq!(config.google_settings().bucket, DEFAULT_BUCKET);
        assert_eq!(config.session_user().office, "Head Office");
    }

    #[test]
    fn test_upload_limit_bytes() {
        assert_eq!(upload_limit_bytes(None).unwrap(), 200 * 1024 * 1024);
        assert_eq!(upload_limit_bytes(Some("5")).unwrap(), 5 * 1024 * 1024);
        assert!(upload_limit_bytes(Some("lots")).is_err());
    }

    #[test]
    fn test_upload_limit_overflow_is_an_error() {
        let huge = usize::MAX.to_string();
        assert!(upload_limit_bytes(Some(&huge)).is_err());

        let just_over = (usize::MAX / (1024 * 1024) + 1).to_string();
        assert!(upload_limit_bytes(Some(&just_over)).is_err());
    }

    #[test]
    fn test_google_settings_carry_endpoint_overrides() {
        let config = Config {
            firestore_api_url: Some("http://localhost:8080/v1".to_string()),
            ..Config::default()
        };

        let settings = config.google_settings();
        assert_eq!(settings.firestore_api_url.as_deref(), Some("http://localhost:8080/v1"));
        assert!(settings.storage_api_url.is_none());
    }

    #[test]
    fn test_from_env_reads_overrides() {
        // SAFETY: Tests run serially or in isolation
        unsafe {
            env::set_var("PORTAL_USER_NAME", "Env User");
            env::set_var("PORTAL_BACKEND", "memory");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.user_name, "Env User");
        assert_eq!(config.backend, BackendKind::Memory);

        unsafe {
            env::remove_var("PORTAL_USER_NAME");
            env::remove_var("PORTAL_BACKEND");
        }
    }
}
