//! Response Cache
//!
//! Combines the TTL store with an in-flight request table so that concurrent
//! identical requests share a single upstream call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::Transport;
use crate::cache::{cache_key, CacheStats, CacheStore, Clock, DEFAULT_TTL_MS};
use crate::error::{CacheError, Result};
use crate::storage::Storage;

type SharedFetch = Shared<BoxFuture<'static, Result<Value>>>;

/// An upstream call that callers for the same key can join.
struct PendingRequest {
    /// Distinguishes this request from a later one for the same key
    id: u64,
    fetch: SharedFetch,
}

/// State guarded by a single lock so that "check pending, check cache,
/// register pending" is atomic per key.
struct Inner {
    store: CacheStore,
    pending: HashMap<String, PendingRequest>,
    next_request_id: u64,
}

impl Inner {
    /// Removes the pending record for `key` if it still belongs to request `id`.
    ///
    /// Returns false when the record was cleared or replaced meanwhile.
    fn finish_pending(&mut self, key: &str, id: u64) -> bool {
        match self.pending.get(key) {
            Some(pending) if pending.id == id => {
                self.pending.remove(key);
                true
            }
            _ => false,
        }
    }
}

// == Response Cache ==
/// Memoized, deduplicated access to idempotent upstream requests.
///
/// Cloning is cheap; all clones share the same cache, in-flight table and
/// transport.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<Mutex<Inner>>,
    transport: Arc<dyn Transport>,
    default_ttl_ms: u64,
}

impl ResponseCache {
    // == Constructors ==
    /// Wraps an already loaded store.
    pub fn new(store: CacheStore, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                store,
                pending: HashMap::new(),
                next_request_id: 0,
            })),
            transport,
            default_ttl_ms: DEFAULT_TTL_MS,
        }
    }

    /// Loads the persisted checkpoint from `storage` and builds a cache on top of it.
    pub fn load(
        storage: Arc<dyn Storage>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(CacheStore::load(storage, clock), transport)
    }

    /// Overrides the TTL used when `fetch_with_cache` is called without one.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl_ms = duration_ms(ttl);
        self
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    // == Fetch With Cache ==
    /// Returns the cached response for `(endpoint, params)`, fetching it if needed.
    ///
    /// Joins an in-flight request for the same key when there is one; otherwise
    /// serves a valid cached value; otherwise POSTs `params` to `endpoint` and
    /// caches the response for `ttl` (default 5 minutes). Failures are never
    /// cached and are returned to every caller that joined the request.
    pub async fn fetch_with_cache(
        &self,
        endpoint: &str,
        params: &Value,
        ttl: Option<Duration>,
    ) -> Result<Value> {
        let key = cache_key(endpoint, params);
        let ttl_ms = ttl.map(duration_ms).unwrap_or(self.default_ttl_ms);

        let fetch = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;

            if let Some(pending) = inner.pending.get(&key) {
                debug!("Joining in-flight request: {}", key);
                inner.store.stats_mut().record_coalesced();
                pending.fetch.clone()
            } else if let Some(value) = inner.store.get(&key) {
                return Ok(value);
            } else {
                self.start_fetch(inner, key, endpoint.to_string(), params.clone(), ttl_ms)
            }
        };

        fetch.await
    }

    /// Like `fetch_with_cache`, then decodes the JSON into `T`.
    ///
    /// A body that does not match `T` is reported as `CacheError::Decode`;
    /// the raw value stays cached.
    pub async fn fetch_typed<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &Value,
        ttl: Option<Duration>,
    ) -> Result<T> {
        let value = self.fetch_with_cache(endpoint, params, ttl).await?;
        serde_json::from_value(value).map_err(|e| CacheError::Decode(e.to_string()))
    }

    /// Spawns the upstream call and registers it as pending. Caller holds the lock.
    fn start_fetch(
        &self,
        inner: &mut Inner,
        key: String,
        endpoint: String,
        params: Value,
        ttl_ms: u64,
    ) -> SharedFetch {
        inner.next_request_id += 1;
        let id = inner.next_request_id;
        inner.store.stats_mut().record_fetch();

        let state = Arc::clone(&self.inner);
        let transport = Arc::clone(&self.transport);
        let task_key = key.clone();

        // Runs to completion even if every caller stops waiting
        let handle = tokio::spawn(async move {
            info!("API Request: POST {}", endpoint);
            let result = transport.post_json(&endpoint, &params).await;

            let mut inner = state.lock().await;
            let still_pending = inner.finish_pending(&task_key, id);
            match &result {
                Ok(value) if still_pending => {
                    inner.store.set(task_key, value.clone(), ttl_ms);
                }
                Ok(_) => {
                    debug!("Cache cleared during request, not storing: {}", task_key);
                }
                Err(e) => {
                    inner.store.stats_mut().record_failure();
                    warn!("API Error: {} ({})", endpoint, e);
                }
            }
            result
        });

        let state = Arc::clone(&self.inner);
        let join_key = key.clone();
        let fetch = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    state.lock().await.finish_pending(&join_key, id);
                    Err(CacheError::Internal(format!("request task failed: {}", e)))
                }
            }
        }
        .boxed()
        .shared();

        inner.pending.insert(
            key,
            PendingRequest {
                id,
                fetch: fetch.clone(),
            },
        );
        fetch
    }

    // == Direct Access ==
    /// Returns the cached value for `key` if it is still valid.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().await.store.get(key)
    }

    /// Stores `value` under `key` for `ttl`.
    pub async fn set(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        self.inner
            .lock()
            .await
            .store
            .set(key.into(), value, duration_ms(ttl));
    }

    /// Removes the entry for `key`. Returns whether one existed.
    pub async fn delete(&self, key: &str) -> bool {
        self.inner.lock().await.store.delete(key)
    }

    /// Removes the cached response for `(endpoint, params)`.
    pub async fn invalidate(&self, endpoint: &str, params: &Value) -> bool {
        self.delete(&cache_key(endpoint, params)).await
    }

    // == Clear ==
    /// Drops every entry, forgets in-flight requests and erases the checkpoint.
    ///
    /// Requests already in flight still complete for their callers but their
    /// results are not stored.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.pending.clear();
        inner.store.clear();
    }

    /// Removes all expired entries. Returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.lock().await.store.cleanup_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.store.stats()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.lock().await.store.keys()
    }

    /// Number of requests currently in flight.
    pub async fn pending_count(&self) -> usize {
        self.inner.lock().await.pending.len()
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("default_ttl_ms", &self.default_ttl_ms)
            .finish_non_exhaustive()
    }
}

fn duration_ms(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}
