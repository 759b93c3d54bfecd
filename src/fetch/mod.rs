//! Fetch Module
//!
//! The caller-facing `ResponseCache`: memoized, deduplicated access to the
//! upstream statistics API through a pluggable `Transport`.

mod http;
mod response_cache;

pub use http::HttpTransport;
pub use response_cache::ResponseCache;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

// == Transport Trait ==
/// Performs the outbound network request for a cache miss.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` as JSON to `endpoint` and returns the decoded JSON response.
    ///
    /// Non-2xx statuses, timeouts and malformed bodies are errors.
    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value>;
}
