//! Cache key derivation.

use serde_json::{Map, Value};

/// Derives the cache key for a request.
///
/// Object keys inside `params` are sorted recursively before serializing,
/// so parameter objects that differ only in key order share a key.
pub fn cache_key(endpoint: &str, params: &Value) -> String {
    format!("{}_{}", endpoint, canonical_json(params))
}

/// Serializes `value` with every object's keys in sorted order.
///
/// serde_json's default map already iterates in sorted order, but any crate
/// in the build enabling its `preserve_order` feature switches every `Map`
/// to insertion order. The explicit sort keeps keys stable either way.
pub fn canonical_json(value: &Value) -> String {
    canonicalize(value).to_string()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_includes_endpoint_and_params() {
        let key = cache_key("/stats", &json!({"state": "Bihar"}));
        assert_eq!(key, r#"/stats_{"state":"Bihar"}"#);
    }

    #[test]
    fn test_canonical_form_sorts_nested_objects() {
        let value: Value =
            serde_json::from_str(r#"{"b":{"y":2,"x":[{"q":1,"p":0}]},"a":null}"#).unwrap();

        assert_eq!(
            canonical_json(&value),
            r#"{"a":null,"b":{"x":[{"p":0,"q":1}],"y":2}}"#
        );
    }

    // Holds with or without serde_json's preserve_order feature
    #[test]
    fn test_key_order_independent() {
        let a: Value = serde_json::from_str(r#"{"a":1,"b":{"y":2,"x":3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"b":{"x":3,"y":2},"a":1}"#).unwrap();

        assert_eq!(cache_key("/stats", &a), cache_key("/stats", &b));
    }

    #[test]
    fn test_array_order_is_significant() {
        let a = json!({"banks": ["SBI", "PNB"]});
        let b = json!({"banks": ["PNB", "SBI"]});

        assert_ne!(cache_key("/stats", &a), cache_key("/stats", &b));
    }

    #[test]
    fn test_endpoint_change_changes_key() {
        let params = json!({});
        assert_ne!(cache_key("/stats", &params), cache_key("/states", &params));
    }

    #[test]
    fn test_nested_objects_in_arrays_are_sorted() {
        let value: Value = serde_json::from_str(r#"[{"z":1,"a":2}]"#).unwrap();
        assert_eq!(canonical_json(&value), r#"[{"a":2,"z":1}]"#);
    }
}
