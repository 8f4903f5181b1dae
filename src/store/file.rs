//! File-backed key-value store
//!
//! Keeps one file per key in an XDG-compliant data directory
//! (`~/.local/share/widgetdash/` on Linux), so values survive restarts.

use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::KvStore;

/// Stores each key as a small file inside a single directory
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where value files are stored
    dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the platform data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "widgetdash")?;
        Some(Self {
            dir: project_dirs.data_dir().to_path_buf(),
        })
    }

    /// Creates a FileStore rooted at a specific directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory holding the value files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a key to its file, replacing characters that are unsafe in file names
    fn key_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{}.kv", name))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.key_path(key), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_set_creates_file_in_store_directory() {
        let (store, temp_dir) = create_test_store();

        store.set("theme", "dark").expect("Write should succeed");

        let expected_path = temp_dir.path().join("theme.kv");
        assert!(expected_path.exists(), "Value file should exist");
        assert_eq!(fs::read_to_string(expected_path).unwrap(), "dark");
    }

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.get("nonexistent_key").is_none());
    }

    #[test]
    fn test_value_survives_new_store_instance() {
        let (store, temp_dir) = create_test_store();
        store.set("widget.weather", "{\"a\":1}").unwrap();

        let reopened = FileStore::with_dir(temp_dir.path().to_path_buf());
        assert_eq!(reopened.get("widget.weather").as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_set_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("store");
        let store = FileStore::with_dir(nested_path.clone());

        store.set("key", "value").expect("Write should succeed");

        assert!(nested_path.join("key.kv").exists());
    }

    #[test]
    fn test_unsafe_key_characters_are_replaced() {
        let (store, temp_dir) = create_test_store();
        store.set("../escape/key", "v").unwrap();

        assert!(temp_dir.path().join(".._escape_key.kv").exists());
        assert_eq!(store.get("../escape/key").as_deref(), Some("v"));
    }

    #[test]
    fn test_overwrite_existing_value() {
        let (store, _temp_dir) = create_test_store();
        store.set("theme", "light").unwrap();
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(store) = FileStore::new() {
            let path_str = store.dir.to_string_lossy();
            assert!(path_str.contains("widgetdash"));
        }
        // Passes if new() returns None (e.g., no home directory in CI)
    }
}
