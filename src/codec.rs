//! Canonical query hashing for the content-addressed response cache.
//!
//! A [`CacheKey`] is a pure function of a query's content: the trimmed query
//! text and its variables (an absent variables mapping is equivalent to an
//! empty one). The pair is serialized as canonical JSON with object keys
//! sorted at every nesting level, then hashed with SHA-256, so that
//! whitespace padding and map key order never change the key and the key is
//! reproducible across process restarts and platforms.

use std::fmt;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Content-addressed cache key: the hex-encoded SHA-256 digest of a
/// canonicalized `(query, variables)` pair.
///
/// Two calls with identical trimmed query text and structurally equal
/// variables always produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// The key as a lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the cache key for a query and its variables.
///
/// `None` variables are treated as an empty mapping, so
/// `compute_key(q, None)` and `compute_key(q, Some(&Map::new()))` agree.
pub fn compute_key(query_text: &str, variables: Option<&Map<String, Value>>) -> CacheKey {
    let mut request = Map::new();
    request.insert(
        "query".to_string(),
        Value::String(query_text.trim().to_string()),
    );
    request.insert(
        "variables".to_string(),
        Value::Object(variables.cloned().unwrap_or_default()),
    );

    let canonical = canonicalize(&Value::Object(request));
    // Serializing a `Value` with string keys cannot fail.
    let bytes = serde_json::to_vec(&canonical).expect("canonical JSON serialization is infallible");

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    CacheKey(hex::encode(hasher.finalize()))
}

/// Rebuild a value with object keys inserted in sorted order at every level.
///
/// Array element order is significant data and is preserved.
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

    fn map_of(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_key_is_hex_sha256() {
        let key = compute_key("{ assets { slug } }", None);
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_deterministic() {
        let vars = map_of(json!({ "slug": "solana", "limit": 10 }));
        let a = compute_key("{ assets { slug } }", Some(&vars));
        let b = compute_key("{ assets { slug } }", Some(&vars));
        assert_eq!(a, b);
    }

    #[test]
    fn test_whitespace_padding_ignored() {
        let a = compute_key("{ assets { slug } }", None);
        let b = compute_key("\n   { assets { slug } }  \t\n", None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_absent_variables_equal_empty_mapping() {
        let empty = Map::new();
        let a = compute_key("{ assets { slug } }", None);
        let b = compute_key("{ assets { slug } }", Some(&empty));
        assert_eq!(a, b);
    }

    #[test]
    fn test_nested_key_order_ignored() {
        let a = map_of(json!({ "where": { "slugs": ["solana"], "typeKeys": ["pos"] }, "limit": 5 }));
        let b = map_of(json!({ "limit": 5, "where": { "typeKeys": ["pos"], "slugs": ["solana"] } }));
        assert_eq!(
            compute_key("{ rewardOptions }", Some(&a)),
            compute_key("{ rewardOptions }", Some(&b)),
        );
    }

    #[test]
    fn test_different_query_different_key() {
        let a = compute_key("{ assets { slug } }", None);
        let b = compute_key("{ assets { name } }", None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_variables_different_key() {
        let a = map_of(json!({ "slug": "solana" }));
        let b = map_of(json!({ "slug": "polkadot" }));
        assert_ne!(
            compute_key("{ assets }", Some(&a)),
            compute_key("{ assets }", Some(&b)),
        );
    }

    #[test]
    fn test_array_order_is_significant() {
        let a = map_of(json!({ "symbols": ["ETH", "BTC"] }));
        let b = map_of(json!({ "symbols": ["BTC", "ETH"] }));
        assert_ne!(
            compute_key("{ assets }", Some(&a)),
            compute_key("{ assets }", Some(&b)),
        );
    }
}
