//! Persisted key-value store
//!
//! Engines persist their state as JSON blobs under string keys. Loading degrades gracefully: a
//! missing blob, an unreadable store or a blob of the wrong shape all yield the default value,
//! and a malformed blob is removed so the next write starts clean.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[error("failed to access store entry {key:?}")]
    Io {
        /// Entry key
        key: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("failed to encode store entry {key:?}")]
    Encode {
        /// Entry key
        key: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// A stored blob is not valid JSON.
    #[error("store entry {key:?} is not valid JSON")]
    Decode {
        /// Entry key
        key: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// The key cannot be mapped onto the backing storage.
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
}

/// Durable JSON storage keyed by string.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be read or holds invalid JSON.
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be written.
    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    /// Remove the blob under `key`; removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be updated.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Load a typed value, falling back to `T::default()` when the blob is missing or unusable.
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let value = match store.read(key) {
        Ok(Some(value)) => value,
        Ok(None) => return T::default(),
        Err(error @ StoreError::Decode { .. }) => {
            warn!(key, %error, "discarding malformed store entry");
            discard(store, key);
            return T::default();
        }
        Err(error) => {
            warn!(key, %error, "failed to read store entry, starting empty");
            return T::default();
        }
    };

    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(error) => {
            warn!(key, %error, "discarding store entry with unexpected shape");
            discard(store, key);
            T::default()
        }
    }
}

/// Encode and write a typed value, logging any failure before returning it.
///
/// # Errors
///
/// Returns a [`StoreError`] if the value cannot be encoded or written.
pub fn save<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let result = serde_json::to_value(value)
        .map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })
        .and_then(|encoded| store.write(key, &encoded));

    if let Err(error) = &result {
        warn!(key, %error, "failed to persist store entry");
    }

    result
}

fn discard(store: &dyn KeyValueStore, key: &str) {
    if let Err(error) = store.remove(key) {
        warn!(key, %error, "failed to remove malformed store entry");
    }
}
