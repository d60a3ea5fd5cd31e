//! Durable credential storage.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use directories::ProjectDirs;
use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// Key/value store for the bearer credential.
///
/// Values survive process restarts until explicitly removed. The store
/// imposes no expiry of its own; a credential the issuer has revoked still
/// reads back here and is weeded out by the session layer's refresh.
pub trait CredentialStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Read the value under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Remove the value under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-memory credential store for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in an [`Arc`] for sharing.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(format!("credential lock poisoned: {e}")))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Unavailable(format!("credential lock poisoned: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(format!("credential lock poisoned: {e}")))?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed credential store.
///
/// Entries live in a single JSON document rewritten atomically on every
/// mutation (sibling temp file, then rename). A missing document reads as
/// empty; a corrupt document is discarded with a warning rather than
/// failing the open.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileCredentialStore {
    /// Open the store at `path`, loading any existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the document exists but
    /// cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "corrupt credential document, starting empty");
                    HashMap::new()
                },
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(StoreError::Unavailable(err.to_string())),
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Open the store in the per-user data directory for `app_name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when no home directory can be
    /// resolved or the data directory cannot be created.
    pub fn open_default(app_name: &str) -> StoreResult<Self> {
        let dirs = ProjectDirs::from("", "", app_name)
            .ok_or_else(|| StoreError::Unavailable("no home directory".to_string()))?;
        let dir = dirs.data_dir();
        fs::create_dir_all(dir).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::open(dir.join("credentials.json"))
    }

    /// Wrap in an [`Arc`] for sharing.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StoreResult<()> {
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(format!("credential lock poisoned: {e}")))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Unavailable(format!("credential lock poisoned: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(format!("credential lock poisoned: {e}")))?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}
