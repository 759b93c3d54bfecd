//! Cache Store Module
//!
//! Main cache engine: HashMap storage with TTL expiration, checkpointed to
//! durable storage after every mutation.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{snapshot, CacheEntry, CacheStats, Clock};
use crate::storage::Storage;

// == Cache Store ==
/// Synchronous TTL cache of JSON values.
///
/// Not thread-safe on its own; `ResponseCache` wraps it in a lock together
/// with the in-flight request table.
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Checkpoint destination
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Loads the last checkpoint from `storage`, dropping already expired entries.
    ///
    /// If anything was dropped the pruned state is written back immediately.
    /// Only expired entries count towards `stats().expired`; orphaned values
    /// are logged by the loader.
    pub fn load(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        let loaded = snapshot::load(storage.as_ref(), clock.now_ms());
        let pruned = loaded.pruned();

        let mut store = Self {
            entries: loaded.entries,
            stats: CacheStats::new(),
            storage,
            clock,
        };
        store.stats.set_total_entries(store.entries.len());

        store.stats.record_expired(loaded.expired);
        if pruned {
            store.checkpoint();
        }
        store
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry and resetting its TTL.
    ///
    /// # Arguments
    /// * `key` - The cache key
    /// * `value` - The decoded response body
    /// * `ttl_ms` - Lifetime in milliseconds; 0 makes the entry valid only at this instant
    pub fn set(&mut self, key: String, value: Value, ttl_ms: u64) {
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl_ms);
        debug!("Cache SET: {} (TTL: {}ms)", key, ttl_ms);

        self.entries.insert(key, entry);
        self.stats.set_total_entries(self.entries.len());
        self.checkpoint();
    }

    // == Get ==
    /// Returns the value if present and not expired.
    ///
    /// An expired entry is removed and the removal checkpointed.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();

        let Some(entry) = self.entries.get(key) else {
            debug!("Cache MISS: {}", key);
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired_at(now) {
            debug!(
                "Cache EXPIRED: {} (age: {}ms)",
                key,
                entry.meta.age_ms(now)
            );
            self.entries.remove(key);
            self.stats.record_expired(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            self.checkpoint();
            return None;
        }

        debug!("Cache HIT: {} (age: {}ms)", key, entry.meta.age_ms(now));
        let value = entry.value.clone();
        self.stats.record_hit();
        Some(value)
    }

    // == Delete ==
    /// Removes an entry by key. Missing keys are a no-op.
    ///
    /// Returns whether an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        debug!("Cache DELETE: {} (present: {})", key, removed);

        self.stats.set_total_entries(self.entries.len());
        self.checkpoint();
        removed
    }

    // == Clear ==
    /// Removes every entry and erases the durable checkpoint.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);

        if let Err(e) = snapshot::erase(self.storage.as_ref()) {
            warn!("Failed to erase persisted cache: {}", e);
        }
        info!("Cache CLEARED");
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed; checkpoints only if non-zero.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        if removed > 0 {
            self.stats.record_expired(removed);
            self.stats.set_total_entries(self.entries.len());
            self.checkpoint();
        }
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    /// Keys currently held, expired or not, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the full cache to storage. Failures are logged and ignored.
    fn checkpoint(&self) {
        if let Err(e) = snapshot::save(self.storage.as_ref(), &self.entries) {
            warn!("Failed to save cache to storage: {}", e);
        }
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}
