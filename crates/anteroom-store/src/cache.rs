//! Session-scoped identity cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// JSON key/value cache whose scope ends with the process/session.
///
/// Nothing here survives a restart; the session controller re-derives the
/// cached identity from the durable token on every fresh start.
pub trait IdentityCache: Send + Sync {
    /// Store a JSON value under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Read the JSON value under `key`.
    fn get_item(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Remove the value under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Remove every value in the cache.
    fn clear_all(&self) -> StoreResult<()>;
}

/// In-memory identity cache.
#[derive(Debug, Default)]
pub struct MemoryIdentityCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryIdentityCache {
    /// Create an empty cache.
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

impl IdentityCache for MemoryIdentityCache {
    fn set_item(&self, key: &str, value: Value) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(format!("cache lock poisoned: {e}")))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn get_item(&self, key: &str) -> StoreResult<Option<Value>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Unavailable(format!("cache lock poisoned: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(format!("cache lock poisoned: {e}")))?;
        entries.remove(key);
        Ok(())
    }

    fn clear_all(&self) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(format!("cache lock poisoned: {e}")))?;
        entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_get_remove_round_trip() {
        let cache = MemoryIdentityCache::new();
        assert_eq!(cache.get_item("identity").unwrap(), None);

        cache
            .set_item("identity", json!({"profileCode": 1}))
            .unwrap();
        assert_eq!(
            cache.get_item("identity").unwrap(),
            Some(json!({"profileCode": 1}))
        );

        cache.remove("identity").unwrap();
        assert_eq!(cache.get_item("identity").unwrap(), None);
        cache.remove("identity").unwrap();
    }

    #[test]
    fn set_replaces_wholesale() {
        let cache = MemoryIdentityCache::new();
        cache
            .set_item("identity", json!({"profileCode": 1}))
            .unwrap();
        cache
            .set_item("identity", json!({"profileCode": 3}))
            .unwrap();
        assert_eq!(
            cache.get_item("identity").unwrap(),
            Some(json!({"profileCode": 3}))
        );
    }

    #[test]
    fn clear_all_empties_every_key() {
        let cache = MemoryIdentityCache::new();
        cache.set_item("identity", json!({})).unwrap();
        cache.set_item("other", json!(42)).unwrap();

        cache.clear_all().unwrap();
        assert_eq!(cache.get_item("identity").unwrap(), None);
        assert_eq!(cache.get_item("other").unwrap(), None);
    }
}
