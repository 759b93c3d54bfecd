//! Error types for the response cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the response cache and the caching proxy.
///
/// `Clone` is required: a single failed upstream call is handed to every
/// caller that was waiting on the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Connection, DNS or other network failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream did not answer within the transport timeout (milliseconds)
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// Upstream answered with a non-success status
    #[error("HTTP Error: {0}")]
    Status(u16),

    /// Body was not valid JSON, or did not match the expected schema
    #[error("Decode error: {0}")]
    Decode(String),

    /// Durable storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// HTTP status the proxy answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::Transport(_) | CacheError::Status(_) | CacheError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            CacheError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Storage(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
