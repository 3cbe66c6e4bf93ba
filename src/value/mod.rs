//! Generic value tree
//!
//! `DecodedValue` is the universal output of decoding: JSON-compatible,
//! schema-agnostic, and ordered. Mappings keep insertion order, which for
//! records is field declaration order.

mod convert;

pub use convert::to_value_tree;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Tagged, JSON-compatible value
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    /// Raw bytes; emitted as standard base64
    Bytes(Vec<u8>),
    String(String),
    Sequence(Vec<DecodedValue>),
    /// Ordered string-keyed entries
    Mapping(Vec<(String, DecodedValue)>),
}

#[cfg(test)]
impl DecodedValue {
    /// Looks up a mapping entry by key
    pub fn get(&self, key: &str) -> Option<&DecodedValue> {
        match self {
            DecodedValue::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DecodedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Mapping keys in order
    pub fn keys(&self) -> Vec<&str> {
        match self {
            DecodedValue::Mapping(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl Serialize for DecodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedValue::Null => serializer.serialize_unit(),
            DecodedValue::Bool(b) => serializer.serialize_bool(*b),
            DecodedValue::Integer(i) => serializer.serialize_i64(*i),
            // JSON has no NaN/Infinity
            DecodedValue::Double(d) if !d.is_finite() => serializer.serialize_unit(),
            DecodedValue::Double(d) => serializer.serialize_f64(*d),
            DecodedValue::Bytes(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            DecodedValue::String(s) => serializer.serialize_str(s),
            DecodedValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DecodedValue::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
