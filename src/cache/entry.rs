//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Entry Metadata ==
/// Creation time and lifetime of an entry, as persisted in the timestamp record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Creation timestamp (Unix milliseconds)
    #[serde(rename = "createdAt")]
    pub created_at: u64,
    /// Lifetime in milliseconds
    #[serde(rename = "ttl")]
    pub ttl_ms: u64,
}

impl EntryMeta {
    /// Age of the entry at `now_ms`. A clock that moved backwards yields 0.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at)
    }

    /// An entry is valid while its age does not exceed its TTL.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.age_ms(now_ms) > self.ttl_ms
    }
}

// == Cache Entry ==
/// A cached response body with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The decoded response body
    pub value: Value,
    pub meta: EntryMeta,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry written at `now_ms` that lives for `ttl_ms`.
    pub fn new(value: Value, now_ms: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            meta: EntryMeta {
                created_at: now_ms,
                ttl_ms,
            },
        }
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.meta.is_expired_at(now_ms)
    }

    // == Time To Live ==
    /// Returns remaining lifetime in milliseconds at `now_ms`, 0 once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.meta.ttl_ms.saturating_sub(self.meta.age_ms(now_ms))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_valid_through_ttl_boundary() {
        let entry = CacheEntry::new(json!({"n": 1}), 0, 1000);

        assert!(!entry.is_expired_at(0));
        assert!(!entry.is_expired_at(500));
        // Age equal to TTL is still valid
        assert!(!entry.is_expired_at(1000));
        assert!(entry.is_expired_at(1001));
    }

    #[test]
    fn test_zero_ttl_only_valid_at_creation() {
        let entry = CacheEntry::new(json!(null), 10, 0);

        assert!(!entry.is_expired_at(10));
        assert!(entry.is_expired_at(11));
    }

    #[test]
    fn test_clock_moving_backwards_keeps_entry() {
        let entry = CacheEntry::new(json!(1), 5_000, 100);
        assert!(!entry.is_expired_at(4_000));
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::new(json!("x"), 1_000, 10_000);

        assert_eq!(entry.ttl_remaining_ms(1_000), 10_000);
        assert_eq!(entry.ttl_remaining_ms(4_000), 7_000);
        assert_eq!(entry.ttl_remaining_ms(20_000), 0);
    }

    #[test]
    fn test_meta_serializes_with_camel_case_fields() {
        let meta = EntryMeta {
            created_at: 1700000000000,
            ttl_ms: 300000,
        };
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json, json!({"createdAt": 1700000000000u64, "ttl": 300000}));
    }
}
