//! Response DTOs for the caching proxy
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for POST /cache/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Whether a cached entry was removed
    pub removed: bool,
    /// The cache key that was targeted
    pub key: String,
}

impl InvalidateResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            removed,
            key: key.into(),
        }
    }
}

/// Response body for POST /cache/clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub fetches: u64,
    pub coalesced: u64,
    pub failures: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Requests currently in flight
    pub pending: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Current cache keys
    pub keys: Vec<String>,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, pending: usize, keys: Vec<String>) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            fetches: stats.fetches,
            coalesced: stats.coalesced,
            failures: stats.failures,
            total_entries: stats.total_entries,
            pending,
            hit_rate: stats.hit_rate(),
            keys,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_hit_rate() {
        let mut stats = CacheStats::new();
        for _ in 0..8 {
            stats.record_hit();
        }
        stats.record_miss();
        stats.record_miss();

        let resp = StatsResponse::new(&stats, 1, vec!["k".to_string()]);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.pending, 1);
        assert_eq!(resp.keys, vec!["k".to_string()]);
    }

    #[test]
    fn test_invalidate_response_serialize() {
        let resp = InvalidateResponse::new("my_key", true);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("\"removed\":true"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
