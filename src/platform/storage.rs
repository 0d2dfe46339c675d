//! Key-value storage backends
//!
//! The session store only needs `has`/`get`/`set` on string keys. Web builds
//! use LocalStorage, native builds keep one file per key, tests use memory.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no value stored under '{0}'")]
    Missing(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimal string key-value backend
pub trait Storage {
    fn has(&self, key: &str) -> bool;
    fn get(&self, key: &str) -> Result<String, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Result<String, StorageError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::Missing(key.to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed storage, one `<key>.json` file per key (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> std::path::PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Storage for FileStorage {
    fn has(&self, key: &str) -> bool {
        self.path(key).is_file()
    }

    fn get(&self, key: &str) -> Result<String, StorageError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::Missing(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Replace atomically: write tmp, then rename over the record
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("LocalStorage".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn has(&self, key: &str) -> bool {
        matches!(self.storage.get_item(key), Ok(Some(_)))
    }

    fn get(&self, key: &str) -> Result<String, StorageError> {
        match self.storage.get_item(key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(StorageError::Missing(key.to_string())),
            Err(e) => Err(StorageError::Unavailable(format!("{e:?}"))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert!(!storage.has("k"));
        assert!(matches!(storage.get("k"), Err(StorageError::Missing(_))));

        storage.set("k", "v").unwrap();
        assert!(storage.has("k"));
        assert_eq!(storage.get("k").unwrap(), "v");

        storage.remove("k").unwrap();
        assert!(!storage.has("k"));
    }

    #[test]
    fn test_file_storage() {
        let dir = std::env::temp_dir().join(format!("pair_flip_storage_{}", std::process::id()));
        let mut storage = FileStorage::new(&dir).unwrap();

        assert!(!storage.has("slot/1"));
        storage.set("slot/1", "{}").unwrap();
        assert!(storage.has("slot/1"));
        assert_eq!(storage.get("slot/1").unwrap(), "{}");

        storage.remove("slot/1").unwrap();
        storage.remove("slot/1").unwrap();
        assert!(matches!(storage.get("slot/1"), Err(StorageError::Missing(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
