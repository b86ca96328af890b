//! Secrets store access

use std::{collections::HashMap, path::Path};

use crate::{SecretError, SecretResult};

/// A value held in a secrets store
#[derive(Debug, Clone, PartialEq)]
pub enum SecretValue {
    /// Plain string (may itself contain serialized JSON)
    Text(String),
    /// Already structured value, e.g. an inline TOML table
    Structured(serde_json::Value),
}

/// Trait for secrets store access
pub trait SecretStore: Send + Sync {
    /// Gets a value from a section of the store
    fn get(&self, section: &str, key: &str) -> SecretResult<Option<SecretValue>>;

    /// Checks if a section exists
    fn has_section(&self, section: &str) -> bool;
}

/// Secrets store backed by a TOML file
///
/// ```toml
/// [firebase]
/// key_json = '''{ "type": "service_account", ... }'''
/// ```
#[derive(Debug, Default)]
pub struct TomlSecretStore {
    table: toml::Table,
}

impl TomlSecretStore {
    /// Parses a store from TOML text
    pub fn parse(contents: &str) -> SecretResult<Self> {
        let table = contents.parse::<toml::Table>()?;
        Ok(Self { table })
    }

    /// Loads a store from a file, returning `None` when the file does not exist
    pub fn load(path: &Path) -> SecretResult<Option<Self>> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No secrets file");
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents).map(Some)
    }
}

impl SecretStore for TomlSecretStore {
    fn get(&self, section: &str, key: &str) -> SecretResult<Option<SecretValue>> {
        let Some(section_value) = self.table.get(section) else {
            return Ok(None);
        };
        let section_table = section_value.as_table().ok_or_else(|| {
            SecretError::InvalidFormat(format!("[{section}] is not a table"))
        })?;

        match section_table.get(key) {
            None => Ok(None),
            Some(toml::Value::String(text)) => Ok(Some(SecretValue::Text(text.clone()))),
            Some(value @ toml::Value::Table(_)) => {
                let structured = serde_json::to_value(value)?;
                Ok(Some(SecretValue::Structured(structured)))
            }
            Some(other) => Err(SecretError::InvalidFormat(format!(
                "{section}.{key} must be a string or table, got {}",
                other.type_str()
            ))),
        }
    }

    fn has_section(&self, section: &str) -> bool {
        self.table.contains_key(section)
    }
}

/// In-memory secrets store for testing
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: HashMap<(String, String), SecretValue>,
}

impl MemorySecretStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to the store
    pub fn with_secret(
        mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: SecretValue,
    ) -> Self {
        self.secrets.insert((section.into(), key.into()), value);
        self
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, section: &str, key: &str) -> SecretResult<Option<SecretValue>> {
        Ok(self
            .secrets
            .get(&(section.to_string(), key.to_string()))
            .cloned())
    }

    fn has_section(&self, section: &str) -> bool {
        self.secrets.keys().any(|(s, _)| s == section)
    }
}
