//! Directory-backed key-value storage.

use std::path::PathBuf;

use pomo_core::error::{PomoError, Result};
use pomo_core::storage::KeyValueStore;
use tracing::debug;

use super::atomic_file::AtomicFile;

/// Stores each key as `<root>/<key>.json`.
///
/// Keys are restricted to ASCII letters, digits, `-`, `_` and `.` (not
/// leading) so a key can never escape the root directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `root`. The directory is created on the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The file backing `key`.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        Ok(AtomicFile::new(self.path_for(key)?))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.file_for(key)?.load()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let file = self.file_for(key)?;
        file.save(value)?;
        debug!(key, path = %file.path().display(), bytes = value.len(), "Stored value");
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(PomoError::storage(format!("Invalid storage key: {:?}", key)))
    }
}
