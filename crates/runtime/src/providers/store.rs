//! Key-value store providers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tileworld_core::KeyValueStore;

/// Volatile in-process store, the default for sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.values.borrow_mut().insert(key.to_owned(), value);
    }
}

/// Store backed by a JSON file, written through on every set.
///
/// Write failures are logged and swallowed; the trait gives no channel to
/// report them and a failed save must not halt the tick loop.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RefCell<HashMap<String, String>>,
}

impl FileStore {
    /// Opens a store file, creating an empty store when the file does not
    /// exist yet.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
            serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            values: RefCell::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        let serialized = match serde_json::to_string_pretty(&*self.values.borrow()) {
            Ok(serialized) => serialized,
            Err(error) => {
                tracing::warn!(%error, "failed to serialize store");
                return;
            }
        };
        if let Err(error) = std::fs::write(&self.path, serialized) {
            tracing::warn!(%error, path = %self.path.display(), "failed to write store");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.values.borrow_mut().insert(key.to_owned(), value);
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("badge::Pewter", "1".to_owned());
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("badge::Pewter"), Some("1".to_owned()));
        assert_eq!(reopened.get("badge::Cerulean"), None);
    }
}
