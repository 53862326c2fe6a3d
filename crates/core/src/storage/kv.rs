use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::CoreError;

/// A durable per-user key/value blob store — the shape of browser
/// localStorage, abstracted so the core can run against a file, a test
/// map, or a host-provided bridge.
pub trait KeyValueStore: Send {
    /// Read the blob under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Write the blob under `key`. Quota and I/O problems surface as
    /// errors; the adapter above decides whether to swallow them.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Drop the blob under `key`. Removing a missing key is fine.
    fn remove(&mut self, key: &str) -> Result<(), CoreError>;
}

/// In-memory store. Nothing survives the process; used by tests and by
/// hosts that do their own persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one `<key>.json` file per key under a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
