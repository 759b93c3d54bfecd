//! Checkpointing of cache contents to durable storage.
//!
//! Two parallel records are kept: one mapping key to cached value and one
//! mapping key to `{createdAt, ttl}`. Both are always written together.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::cache::{CacheEntry, EntryMeta};
use crate::error::{CacheError, Result};
use crate::storage::Storage;

/// Storage item holding key → cached value.
pub const VALUES_ITEM: &str = "api_cache";
/// Storage item holding key → `{createdAt, ttl}`.
pub const TIMESTAMPS_ITEM: &str = "api_cache_timestamps";

/// Result of reading a checkpoint back.
#[derive(Debug, Default)]
pub struct Loaded {
    pub entries: HashMap<String, CacheEntry>,
    /// Entries whose TTL had already run out
    pub expired: usize,
    /// Values that had no timestamp record
    pub orphaned: usize,
}

impl Loaded {
    /// Whether anything in storage was left behind.
    pub fn pruned(&self) -> bool {
        self.expired + self.orphaned > 0
    }
}

/// Loads the last checkpoint, dropping entries already expired at `now_ms`.
///
/// A missing, unreadable or corrupt checkpoint is logged and yields nothing.
pub fn load(storage: &dyn Storage, now_ms: u64) -> Loaded {
    match read_records(storage) {
        Ok(Some((values, timestamps))) => {
            let mut loaded = Loaded {
                entries: HashMap::with_capacity(values.len()),
                ..Loaded::default()
            };

            for (key, value) in values {
                // A value without a timestamp record cannot be validated
                let Some(meta) = timestamps.get(&key) else {
                    loaded.orphaned += 1;
                    continue;
                };
                if meta.is_expired_at(now_ms) {
                    loaded.expired += 1;
                    continue;
                }
                loaded.entries.insert(key, CacheEntry { value, meta: *meta });
            }

            info!(
                "Cache loaded from storage: {} entries ({} expired, {} orphaned dropped)",
                loaded.entries.len(),
                loaded.expired,
                loaded.orphaned
            );
            loaded
        }
        Ok(None) => Loaded::default(),
        Err(e) => {
            warn!("Failed to load cache from storage: {}", e);
            Loaded::default()
        }
    }
}

fn read_records(
    storage: &dyn Storage,
) -> Result<Option<(Map<String, Value>, HashMap<String, EntryMeta>)>> {
    let values = storage.get_item(VALUES_ITEM)?;
    let timestamps = storage.get_item(TIMESTAMPS_ITEM)?;

    let (Some(values), Some(timestamps)) = (values, timestamps) else {
        return Ok(None);
    };

    let values: Map<String, Value> =
        serde_json::from_str(&values).map_err(|e| CacheError::Decode(e.to_string()))?;
    let timestamps: HashMap<String, EntryMeta> =
        serde_json::from_str(&timestamps).map_err(|e| CacheError::Decode(e.to_string()))?;

    Ok(Some((values, timestamps)))
}

/// Writes both records for the given entries.
pub fn save(storage: &dyn Storage, entries: &HashMap<String, CacheEntry>) -> Result<()> {
    let mut values = Map::new();
    let mut timestamps = HashMap::with_capacity(entries.len());

    for (key, entry) in entries {
        values.insert(key.clone(), entry.value.clone());
        timestamps.insert(key.as_str(), entry.meta);
    }

    let values = serde_json::to_string(&values).map_err(|e| CacheError::Decode(e.to_string()))?;
    let timestamps =
        serde_json::to_string(&timestamps).map_err(|e| CacheError::Decode(e.to_string()))?;

    storage.set_item(VALUES_ITEM, &values)?;
    storage.set_item(TIMESTAMPS_ITEM, &timestamps)
}

/// Removes both records so nothing is restored on the next load.
pub fn erase(storage: &dyn Storage) -> Result<()> {
    storage.remove_item(VALUES_ITEM)?;
    storage.remove_item(TIMESTAMPS_ITEM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        let mut entries = HashMap::new();
        entries.insert("A".to_string(), CacheEntry::new(json!({"n": 1}), 0, 1000));

        save(&storage, &entries).unwrap();
        let loaded = load(&storage, 500);

        assert!(!loaded.pruned());
        assert_eq!(loaded.entries, entries);
    }

    #[test]
    fn test_load_drops_expired_entries() {
        let storage = MemoryStorage::new();
        let mut entries = HashMap::new();
        entries.insert("short".to_string(), CacheEntry::new(json!(1), 0, 100));
        entries.insert("long".to_string(), CacheEntry::new(json!(2), 0, 10_000));

        save(&storage, &entries).unwrap();
        let loaded = load(&storage, 5_000);

        assert_eq!(loaded.expired, 1);
        assert_eq!(loaded.orphaned, 0);
        assert!(loaded.entries.contains_key("long"));
        assert!(!loaded.entries.contains_key("short"));
    }

    #[test]
    fn test_load_drops_values_without_timestamps() {
        let storage = MemoryStorage::new();
        storage.set_item(VALUES_ITEM, r#"{"a":1,"b":2}"#).unwrap();
        storage
            .set_item(TIMESTAMPS_ITEM, r#"{"a":{"createdAt":0,"ttl":1000}}"#)
            .unwrap();

        let loaded = load(&storage, 10);

        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries["a"].value, json!(1));
        assert_eq!(loaded.orphaned, 1);
        assert_eq!(loaded.expired, 0);
    }

    #[test]
    fn test_corrupt_record_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(VALUES_ITEM, "not json").unwrap();
        storage.set_item(TIMESTAMPS_ITEM, "{}").unwrap();

        let loaded = load(&storage, 0);

        assert!(loaded.entries.is_empty());
        assert!(!loaded.pruned());
    }

    #[test]
    fn test_missing_record_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(VALUES_ITEM, r#"{"a":1}"#).unwrap();

        let loaded = load(&storage, 0);
        assert!(loaded.entries.is_empty());
    }

    #[test]
    fn test_erase_removes_both_records() {
        let storage = MemoryStorage::new();
        save(&storage, &HashMap::new()).unwrap();
        assert_eq!(storage.len(), 2);

        erase(&storage).unwrap();
        assert!(storage.is_empty());
    }
}
