//! API credential storage: a persistent key-value file plus the in-memory
//! value the service uses for outbound calls.
//!
//! The credential is loaded once at startup and written through on every
//! change. A blank value clears it from storage. The value is never logged.

pub mod handlers;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// Key the Gemini API key is stored under.
pub const CREDENTIAL_KEY: &str = "gemini-api-key";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credential store at {} is not a JSON object: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent key-value storage for the credential.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>, StoreError>;
    async fn save(&self, value: &str) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// FileCredentialStore
// ────────────────────────────────────────────────────────────────────────────

/// A JSON object on disk. Only `CREDENTIAL_KEY` is touched; any other keys
/// in the file are preserved across writes.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }
        let body = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries().await?.remove(CREDENTIAL_KEY))
    }

    async fn save(&self, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_entries().await?;
        entries.insert(CREDENTIAL_KEY.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.read_entries().await?;
        if entries.remove(CREDENTIAL_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryCredentialStore
// ────────────────────────────────────────────────────────────────────────────

/// In-process store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(CREDENTIAL_KEY).cloned())
    }

    async fn save(&self, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .await
            .insert(CREDENTIAL_KEY.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.lock().await.remove(CREDENTIAL_KEY);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Credentials
// ────────────────────────────────────────────────────────────────────────────

/// The current credential, backed by a store. Cheap to clone.
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn CredentialStore>,
    current: Arc<RwLock<Option<String>>>,
}

impl Credentials {
    /// Reads the store once. Later reads come from memory.
    pub async fn load(store: Arc<dyn CredentialStore>) -> Result<Self, StoreError> {
        let current = store.load().await?.filter(|v| !v.trim().is_empty());
        info!(
            "Credential store loaded (configured: {})",
            current.is_some()
        );
        Ok(Self {
            store,
            current: Arc::new(RwLock::new(current)),
        })
    }

    pub async fn current(&self) -> Option<String> {
        self.current.read().await.clone()
    }

    pub async fn is_configured(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Stores `value`, or clears the credential when `value` is blank.
    /// The stored value is kept exactly as given.
    pub async fn set(&self, value: &str) -> Result<(), StoreError> {
        if value.trim().is_empty() {
            return self.clear().await;
        }
        let mut current = self.current.write().await;
        self.store.save(value).await?;
        *current = Some(value.to_string());
        info!("API credential updated");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut current = self.current.write().await;
        self.store.clear().await?;
        *current = None;
        info!("API credential cleared");
        Ok(())
    }
}
