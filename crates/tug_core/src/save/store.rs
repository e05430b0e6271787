//! Key-value persistence backends.
//!
//! Values are opaque strings and callers decide the encoding per key, the
//! shape browser-style local storage has. The file backend writes each key
//! as its own file so a torn write can never take unrelated keys with it.

use std::collections::HashMap;
use std::fs::{create_dir_all, remove_file, rename, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use super::error::SaveError;

pub trait KvStore {
    /// Read a value; `None` when the key was never written.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.dat", key))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        if !path.exists() {
            return None;
        }

        let mut value = String::new();
        match File::open(&path).and_then(|mut file| file.read_to_string(&mut value)) {
            Ok(_) => Some(value),
            Err(err) => {
                log::warn!("failed to read {:?}: {}", path, err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        create_dir_all(&self.dir)?;

        let path = self.key_path(key);

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.flush()?;

            // sync_all ensures data is written to disk (portable fsync)
            file.sync_all()?;
        }
        rename(&temp_path, &path)?;

        log::debug!("saved {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        let path = self.key_path(key);
        if path.exists() {
            remove_file(&path)?;
            log::debug!("removed {:?}", path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("coins"), None);

        store.set("coins", "120").unwrap();
        assert_eq!(store.get("coins"), Some("120".to_string()));

        store.set("coins", "240").unwrap();
        assert_eq!(store.get("coins"), Some("240".to_string()));

        store.remove("coins").unwrap();
        assert_eq!(store.get("coins"), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        assert_eq!(store.get("coins"), None);
        store.set("coins", "55").unwrap();
        assert_eq!(store.get("coins"), Some("55".to_string()));

        store.remove("coins").unwrap();
        assert_eq!(store.get("coins"), None);
        // Removing a missing key is not an error
        store.remove("coins").unwrap();
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = FileStore::new(temp_dir.path());
            store.set("skins", r#"["default","ninja"]"#).unwrap();
        }

        let store = FileStore::new(temp_dir.path());
        assert_eq!(store.get("skins"), Some(r#"["default","ninja"]"#.to_string()));
    }

    #[test]
    fn test_file_store_write_is_atomic() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        store.set("history", "[]").unwrap();

        // No temp file left behind
        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|ext| ext == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_keys_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a"), Some("1".to_string()));
        assert_eq!(store.get("b"), Some("2".to_string()));
    }
}
