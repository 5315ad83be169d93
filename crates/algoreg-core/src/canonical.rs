//! # Canonical Serialization
//!
//! `CanonicalBytes` is the only input [`crate::sha256_digest`] accepts. It is
//! produced by serializing a value with `serde_jcs` (RFC 8785): object keys
//! sorted, compact separators, one byte sequence per logical value.
//!
//! Two ledgers in the same state therefore hash identically regardless of
//! map iteration order or field declaration order.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// JCS-canonical JSON bytes.
///
/// The inner buffer is private; [`CanonicalBytes::new()`] is the only
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_keys_compact() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn test_nested_objects_sorted() {
        let data = serde_json::json!({"outer": {"b": 2, "a": 1}, "list": [3, 2, 1]});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_struct_field_order_irrelevant() {
        #[derive(Serialize)]
        struct Ab {
            a: u8,
            b: u8,
        }
        #[derive(Serialize)]
        struct Ba {
            b: u8,
            a: u8,
        }
        let x = CanonicalBytes::new(&Ab { a: 1, b: 2 }).unwrap();
        let y = CanonicalBytes::new(&Ba { b: 2, a: 1 }).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn test_unicode_passthrough() {
        let cb = CanonicalBytes::new(&serde_json::json!({"name": "é"})).unwrap();
        assert!(std::str::from_utf8(cb.as_bytes()).unwrap().contains('é'));
        assert!(!cb.is_empty());
    }
}
