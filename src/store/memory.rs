//! In-process store

use std::sync::{PoisonError, RwLock};

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::{KeyValueStore, StoreError};

/// Store backed by a map, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<FxHashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry.
    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, value: Value) -> Self {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value);

        self
    }

    /// Current blob under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.clone());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        Ok(())
    }
}
