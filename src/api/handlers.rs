//! API Handlers
//!
//! HTTP request handlers for the caching proxy endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::Value;
use tracing::error;

use crate::cache::cache_key;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::ResponseCache;
use crate::models::{
    empty_object, ClearResponse, HealthResponse, InvalidateRequest, InvalidateResponse,
    PublicStats, StatsResponse, PUBLIC_STATS_PATH,
};

/// Header that overrides the cache TTL (milliseconds) for a proxied request.
pub const TTL_HEADER: &str = "x-cache-ttl-ms";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared response cache
    pub cache: ResponseCache,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState from a cache and configuration.
    pub fn new(cache: ResponseCache, config: Config) -> Self {
        Self {
            cache,
            config: Arc::new(config),
        }
    }
}

/// Handler for POST /api/*path
///
/// Forwards the JSON body as request params to the upstream API through the
/// cache. An empty body is treated as `{}`.
pub async fn proxy_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let params = parse_params(&body)?;
    let ttl = ttl_override(&headers)?;
    let endpoint = state.config.upstream_endpoint(&path);

    let value = state
        .cache
        .fetch_with_cache(&endpoint, &params, ttl)
        .await
        .inspect_err(|e| error!("Proxy error: {} ({})", endpoint, e))?;

    Ok(Json(value))
}

/// Handler for GET /dashboard/public-stats
///
/// Returns the public dashboard statistics in their typed, normalized shape.
pub async fn public_stats_handler(State(state): State<AppState>) -> Result<Json<PublicStats>> {
    let endpoint = state.config.upstream_endpoint(PUBLIC_STATS_PATH);
    let stats = state
        .cache
        .fetch_typed::<PublicStats>(&endpoint, &empty_object(), None)
        .await?;

    Ok(Json(stats))
}

/// Handler for POST /cache/invalidate
///
/// Removes the cached response for one `(endpoint, params)` pair.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = cache_key(&req.endpoint, &req.params);
    let removed = state.cache.delete(&key).await;

    Ok(Json(InvalidateResponse::new(key, removed)))
}

/// Handler for POST /cache/clear
///
/// Full clear, as performed on logout.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    Json(ClearResponse::cleared())
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    let pending = state.cache.pending_count().await;
    let keys = state.cache.keys().await;

    Json(StatsResponse::new(&stats, pending, keys))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

fn parse_params(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(empty_object());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => Ok(empty_object()),
        Ok(params) => Ok(params),
        Err(e) => Err(CacheError::InvalidRequest(format!(
            "Body is not valid JSON: {}",
            e
        ))),
    }
}

fn ttl_override(headers: &HeaderMap) -> Result<Option<Duration>> {
    let Some(raw) = headers.get(TTL_HEADER) else {
        return Ok(None);
    };

    raw.to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|ms| Some(Duration::from_millis(ms)))
        .ok_or_else(|| {
            CacheError::InvalidRequest(format!("{} must be a non-negative integer", TTL_HEADER))
        })
}
