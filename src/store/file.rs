//! Directory-backed store

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde_json::Value;

use super::{KeyValueStore, StoreError};

/// Store keeping one `<key>.json` file per entry inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a crash mid-write
/// leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the entries.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

        if valid {
            Ok(self.root.join(format!("{key}.json")))
        } else {
            Err(StoreError::InvalidKey(key.to_string()))
        }
    }
}

fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path(key)?;

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(io_error(key)(error)),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            })
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path(key)?;
        let staging = path.with_extension("json.tmp");

        let encoded = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;

        fs::create_dir_all(&self.root).map_err(io_error(key))?;
        fs::write(&staging, encoded).map_err(io_error(key))?;
        fs::rename(&staging, &path).map_err(io_error(key))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path(key)?;

        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(key)(error)),
        }
    }
}
