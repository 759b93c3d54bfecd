//! Request DTOs for the caching proxy
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Request body for POST /cache/invalidate
///
/// Identifies a cached response by the same `(endpoint, params)` pair the
/// fetch used. Missing `params` means `{}`.
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Full upstream endpoint URL
    pub endpoint: String,
    #[serde(default = "empty_object")]
    pub params: Value,
}

impl InvalidateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.endpoint.is_empty() {
            return Some("Endpoint cannot be empty".to_string());
        }
        None
    }
}

/// The params value used when a request carries none.
pub fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalidate_request_deserialize() {
        let json = r#"{"endpoint": "http://up/api/stats", "params": {"state": "Bihar"}}"#;
        let req: InvalidateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.endpoint, "http://up/api/stats");
        assert_eq!(req.params, json!({"state": "Bihar"}));
    }

    #[test]
    fn test_invalidate_request_default_params() {
        let req: InvalidateRequest = serde_json::from_str(r#"{"endpoint": "e"}"#).unwrap();
        assert_eq!(req.params, json!({}));
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_empty_endpoint() {
        let req = InvalidateRequest {
            endpoint: "".to_string(),
            params: empty_object(),
        };
        assert!(req.validate().is_some());
    }
}
