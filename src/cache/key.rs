//! Key Derivation Module
//!
//! Turns a namespace prefix plus an arbitrary lookup key into a stable
//! cache key string.

use serde_json::Value;

/// Leading character of every derived key.
pub const KEY_DELIMITER: char = ':';

/// Derives the cache key for `key` under `prefix`.
///
/// String keys that already start with `:` are returned unchanged. Other
/// keys are rendered as JSON; object fields are ordered by name, so equal
/// values always produce the same key.
///
/// # Arguments
/// * `prefix` - Optional namespace, `None` means no namespace
/// * `key` - Any JSON value identifying the cached item
pub fn derive_key(prefix: Option<&str>, key: &Value) -> String {
    if let Value::String(s) = key {
        if s.starts_with(KEY_DELIMITER) {
            return s.clone();
        }
    }

    let raw = match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let prefix = match prefix {
        Some(p) => format!("{p}{KEY_DELIMITER}"),
        None => String::new(),
    };
    let combined = format!("{prefix}{raw}");

    format!(
        "{KEY_DELIMITER}{prefix}-{}-{}",
        djb2(&raw),
        djb2(&combined)
    )
}

/// djb2 string hash rendered as 8 hex digits.
pub fn djb2(input: &str) -> String {
    let hash = input
        .bytes()
        .fold(5381u32, |hash, b| hash.wrapping_mul(33).wrapping_add(u32::from(b)));
    format!("{hash:08x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_djb2_known_values() {
        assert_eq!(djb2(""), "00001505");
        assert_eq!(djb2("a"), "0002b606");
        assert_eq!(djb2("hello").len(), 8);
    }

    #[test]
    fn test_derive_key_shape() {
        let key = derive_key(Some("fetch"), &json!("abc"));
        assert!(key.starts_with(":fetch:-"));
        let parts: Vec<&str> = key.rsplitn(3, '-').collect();
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 8);
    }

    #[test]
    fn test_derive_key_no_prefix() {
        let key = derive_key(None, &json!("abc"));
        assert_eq!(key, format!(":-{}-{}", djb2("abc"), djb2("abc")));
    }

    #[test]
    fn test_derive_key_passthrough() {
        assert_eq!(derive_key(Some("p"), &json!(":foo")), ":foo");
        assert_eq!(derive_key(None, &json!(":foo")), ":foo");
    }

    #[test]
    fn test_derive_key_object_field_order() {
        let a = json!({"url": "https://a", "method": "GET"});
        let b = json!({"method": "GET", "url": "https://a"});
        assert_eq!(derive_key(Some("x"), &a), derive_key(Some("x"), &b));
    }

    #[test]
    fn test_derive_key_prefix_matters() {
        let value = json!({"n": 1});
        assert_ne!(derive_key(Some("a"), &value), derive_key(Some("b"), &value));
        assert_ne!(derive_key(None, &value), derive_key(Some(""), &value));
    }

    #[test]
    fn test_string_key_hashes_text() {
        // "1" hashes its text, 1 hashes its JSON rendering, which is the same
        assert_eq!(derive_key(None, &json!("1")), derive_key(None, &json!(1)));
        assert_ne!(derive_key(None, &json!("\"1\"")), derive_key(None, &json!(1)));
    }

    #[test]
    fn test_no_collisions_over_many_pairs() {
        let mut seen = HashSet::new();
        for p in 0..50 {
            let prefix = format!("ns{p}");
            for k in 0..100 {
                let key = json!({ "id": k, "tag": format!("item-{}", k * 7 + p) });
                assert!(seen.insert(derive_key(Some(prefix.as_str()), &key)));
            }
        }
        assert_eq!(seen.len(), 5000);
    }
}
