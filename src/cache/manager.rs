//! Last-good payload cache for refreshing widgets
//!
//! Provides a `WidgetCache` that stores the most recent successful payload of
//! each widget in the shared key-value store, so the widget can fall back to it
//! when a later fetch fails.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

use crate::store::KvStore;

/// Prefix for widget payload keys in the key-value store
const KEY_PREFIX: &str = "widget.";

/// Wrapper stored on disk for each widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<P> {
    /// Widget the payload belongs to
    pub widget_id: String,
    /// The last successfully fetched payload
    pub payload: P,
    /// When the payload was stored
    pub stored_at: DateTime<Utc>,
}

/// Reads and writes last-good payloads, one entry per widget id
#[derive(Clone)]
pub struct WidgetCache {
    store: Arc<dyn KvStore>,
}

impl std::fmt::Debug for WidgetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetCache").finish_non_exhaustive()
    }
}

impl WidgetCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Store key for a widget id
    fn key(widget_id: &str) -> String {
        format!("{}{}", KEY_PREFIX, widget_id)
    }

    /// Overwrites the entry for `widget_id` with `payload`
    ///
    /// # Returns
    /// * `Ok(())` once the entry is persisted
    /// * `Err` if serialization or the underlying store write fails
    pub fn store<P: Serialize>(&self, widget_id: &str, payload: &P) -> std::io::Result<()> {
        let entry = CacheEntry {
            widget_id: widget_id.to_string(),
            payload,
            stored_at: Utc::now(),
        };

        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        self.store.set(&Self::key(widget_id), &json)
    }

    /// Returns the last stored entry for `widget_id`
    ///
    /// Never fails: a missing key, an unreadable value, or a value that no
    /// longer matches the payload shape are all reported as `None`.
    pub fn load<P: DeserializeOwned>(&self, widget_id: &str) -> Option<CacheEntry<P>> {
        let content = self.store.get(&Self::key(widget_id))?;
        match serde_json::from_str::<CacheEntry<P>>(&content) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(widget = %widget_id, error = %err, "ignoring unreadable cache entry");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn create_test_cache() -> (WidgetCache, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (WidgetCache::new(store.clone()), store)
    }

    #[test]
    fn test_load_returns_none_for_missing_widget() {
        let (cache, _store) = create_test_cache();
        let result: Option<CacheEntry<TestData>> = cache.load("weather");
        assert!(result.is_none());
    }

    #[test]
    fn test_store_then_load_returns_same_payload() {
        let (cache, _store) = create_test_cache();
        let data = TestData {
            name: "weather".to_string(),
            value: 42,
        };

        cache.store("weather", &data).expect("Store should succeed");

        let entry: CacheEntry<TestData> = cache.load("weather").expect("Entry should exist");
        assert_eq!(entry.payload, data);
        assert_eq!(entry.widget_id, "weather");
    }

    #[test]
    fn test_store_overwrites_previous_entry() {
        let (cache, store) = create_test_cache();
        let first = TestData {
            name: "first".to_string(),
            value: 1,
        };
        let second = TestData {
            name: "second".to_string(),
            value: 2,
        };

        cache.store("news", &first).unwrap();
        cache.store("news", &second).unwrap();

        let entry: CacheEntry<TestData> = cache.load("news").unwrap();
        assert_eq!(entry.payload, second);
        assert_eq!(store.len(), 1, "Only one entry per widget id");
    }

    #[test]
    fn test_entries_are_keyed_by_widget_id() {
        let (cache, store) = create_test_cache();
        cache.store("weather", &1_i32).unwrap();
        cache.store("news", &2_i32).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(cache.load::<i32>("weather").unwrap().payload, 1);
        assert_eq!(cache.load::<i32>("news").unwrap().payload, 2);
    }

    #[test]
    fn test_corrupt_entry_is_treated_as_absent() {
        let (cache, store) = create_test_cache();
        store.set("widget.weather", "{ not json").unwrap();

        let result: Option<CacheEntry<TestData>> = cache.load("weather");
        assert!(result.is_none());
    }

    #[test]
    fn test_mismatched_payload_shape_is_treated_as_absent() {
        let (cache, _store) = create_test_cache();
        cache.store("weather", &"just a string").unwrap();

        let result: Option<CacheEntry<TestData>> = cache.load("weather");
        assert!(result.is_none());
    }

    #[test]
    fn test_stored_at_timestamp_is_recorded() {
        let (cache, _store) = create_test_cache();

        let before = Utc::now();
        cache.store("weather", &7_i32).unwrap();
        let after = Utc::now();

        let entry: CacheEntry<i32> = cache.load("weather").unwrap();
        assert!(entry.stored_at >= before);
        assert!(entry.stored_at <= after);
    }

    #[test]
    fn test_entry_survives_reopening_file_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data = TestData {
            name: "persisted".to_string(),
            value: 99,
        };

        let cache = WidgetCache::new(Arc::new(FileStore::with_dir(temp_dir.path().to_path_buf())));
        cache.store("weather", &data).unwrap();

        let reopened = WidgetCache::new(Arc::new(FileStore::with_dir(temp_dir.path().to_path_buf())));
        let entry: CacheEntry<TestData> = reopened.load("weather").unwrap();
        assert_eq!(entry.payload, data);
    }
}
