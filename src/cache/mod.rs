//! Cache module for widget payloads
//!
//! Persists the last successful payload of each widget through the shared
//! key-value store. Loading never fails: anything that cannot be read back is
//! treated as "no cached payload", which lets a widget degrade to its
//! unavailable state instead of erroring.

mod manager;

pub use manager::{CacheEntry, WidgetCache};
