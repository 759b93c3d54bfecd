//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::fetch::ResponseCache;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// Reads already evict stale entries on their own; the sweep only keeps
/// entries nobody asks for again from piling up in memory and in the
/// checkpoint.
///
/// # Arguments
/// * `cache` - Shared response cache
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 300);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: ResponseCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::error::{CacheError, Result};
    use crate::fetch::Transport;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct NoNetwork;

    #[async_trait]
    impl Transport for NoNetwork {
        async fn post_json(&self, endpoint: &str, _body: &Value) -> Result<Value> {
            Err(CacheError::Transport(format!("no network for {}", endpoint)))
        }
    }

    fn create_cache(clock: &ManualClock) -> ResponseCache {
        ResponseCache::load(
            Arc::new(MemoryStorage::new()),
            Arc::new(NoNetwork),
            Arc::new(clock.clone()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_removes_expired_entries() {
        let clock = ManualClock::new(0);
        let cache = create_cache(&clock);

        cache
            .set("expire_soon", json!("value"), Duration::from_millis(500))
            .await;
        cache
            .set("long_lived", json!("value"), Duration::from_secs(3600))
            .await;

        let handle = spawn_cleanup_task(cache.clone(), 1);

        clock.set(1_000);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Swept without anyone reading the key
        assert_eq!(cache.keys().await, vec!["long_lived".to_string()]);
        assert_eq!(cache.stats().await.expired, 1);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_preserves_valid_entries() {
        let clock = ManualClock::new(0);
        let cache = create_cache(&clock);
        cache
            .set("long_lived", json!("value"), Duration::from_secs(3600))
            .await;

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(cache.get("long_lived").await, Some(json!("value")));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache = create_cache(&ManualClock::new(0));

        let handle = spawn_cleanup_task(cache, 1);

        // Abort immediately
        handle.abort();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
