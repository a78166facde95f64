//! Durable key-value storage port.
//!
//! The task list is persisted as a single serialized value under a fixed key,
//! mirroring the browser's local storage. Implementations must finish the
//! write before `set` returns so a following `get` observes it.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{PomoError, Result};

/// Synchronous string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key is unset.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process storage, used headless and in tests.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| PomoError::storage(format!("Failed to lock memory store: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| PomoError::storage(format!("Failed to lock memory store: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = MemoryKeyValueStore::with_entry("k", "1");
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("other").unwrap(), None);
    }
}
