//! Persisted AWS settings.
//!
//! The settings document is a small JSON file:
//!
//! ```json
//! { "aws": { "key": "AKIA...", "secret": "...", "region": "eu-west-1" } }
//! ```
//!
//! Unknown top-level sections are preserved on save.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::SettingsError;

/// The `aws` section of the settings document.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsSettings {
    /// Access key id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Secret access key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Preferred region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl std::fmt::Debug for AwsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSettings")
            .field("key", &self.key)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .finish()
    }
}

/// Durable storage for [`AwsSettings`].
#[async_trait]
pub trait SettingsStore: Send + Sync + std::fmt::Debug {
    /// Load the current settings. A store that has never been written
    /// yields empty settings.
    async fn load(&self) -> Result<AwsSettings, SettingsError>;

    /// Replace the stored settings.
    async fn save(&self, settings: AwsSettings) -> Result<(), SettingsError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    aws: AwsSettings,
    #[serde(flatten)]
    other: Map<String, Value>,
}

/// Settings persisted as a JSON file.
#[derive(Debug)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSettingsStore {
    /// Create a store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the settings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<SettingsDocument, SettingsError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(SettingsDocument::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "settings file not found, using empty settings");
                Ok(SettingsDocument::default())
            }
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self) -> Result<AwsSettings, SettingsError> {
        Ok(self.read_document().await?.aws)
    }

    async fn save(&self, settings: AwsSettings) -> Result<(), SettingsError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        document.aws = settings;
        let bytes = serde_json::to_vec_pretty(&document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        // Write-then-rename so a crash never leaves a truncated document.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        info!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}

/// Settings held in memory only.
///
/// # Examples
///
/// ```
/// use bucketstore_core::settings::{AwsSettings, MemorySettingsStore, SettingsStore};
///
/// # tokio_test::block_on(async {
/// let store = MemorySettingsStore::default();
/// store
///     .save(AwsSettings {
///         region: Some("eu-west-1".to_owned()),
///         ..AwsSettings::default()
///     })
///     .await
///     .unwrap();
/// assert_eq!(store.load().await.unwrap().region.as_deref(), Some("eu-west-1"));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RwLock<AwsSettings>,
}

impl MemorySettingsStore {
    /// Create a store pre-populated with `settings`.
    #[must_use]
    pub fn new(settings: AwsSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<AwsSettings, SettingsError> {
        Ok(self.settings.read().clone())
    }

    async fn save(&self, settings: AwsSettings) -> Result<(), SettingsError> {
        *self.settings.write() = settings;
        Ok(())
    }
}
