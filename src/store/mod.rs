//! Persistent key-value storage
//!
//! String-keyed, string-valued storage with synchronous get/set. Entries never
//! expire; they stay until overwritten or until the backing storage is cleared
//! outside the application. Widgets cache their last payload here and the theme
//! preference lives here too.

mod file;

pub use file::FileStore;

use std::collections::HashMap;
use std::io;
use std::sync::RwLock;

/// Synchronous string key-value store shared by every widget
pub trait KvStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// In-memory store, used in tests and when no data directory is available
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
