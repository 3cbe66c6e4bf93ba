//! Decoded record -> value tree

use crate::wire::{DecodedRecord, FieldValue};

use super::DecodedValue;

/// Converts a decoded record into a mapping keyed by field name.
///
/// Pure and total: every present field appears, in declaration order.
pub fn to_value_tree(record: &DecodedRecord) -> DecodedValue {
    DecodedValue::Mapping(
        record
            .fields
            .iter()
            .map(|field| (field.name.clone(), field_to_value(&field.value)))
            .collect(),
    )
}

/// Converts one field value, recursing into containers and structs
fn field_to_value(value: &FieldValue) -> DecodedValue {
    match value {
        FieldValue::Bool(b) => DecodedValue::Bool(*b),
        FieldValue::Byte(i) => DecodedValue::Integer(i64::from(*i)),
        FieldValue::I16(i) => DecodedValue::Integer(i64::from(*i)),
        FieldValue::I32(i) | FieldValue::Enum(i) => DecodedValue::Integer(i64::from(*i)),
        FieldValue::I64(i) => DecodedValue::Integer(*i),
        FieldValue::Double(d) => DecodedValue::Double(*d),
        FieldValue::String(s) => DecodedValue::String(s.clone()),
        FieldValue::Binary(bytes) => DecodedValue::Bytes(bytes.clone()),
        FieldValue::List(items) | FieldValue::Set(items) => {
            DecodedValue::Sequence(items.iter().map(field_to_value).collect())
        }
        FieldValue::Map(entries) => DecodedValue::Sequence(
            entries
                .iter()
                .map(|(k, v)| map_entry(field_to_value(k), field_to_value(v)))
                .collect(),
        ),
        FieldValue::Struct(record) => to_value_tree(record),
    }
}

/// One map entry as `{"key": k, "value": v}`.
///
/// Keys keep their own type, so distinct keys never collide.
fn map_entry(key: DecodedValue, value: DecodedValue) -> DecodedValue {
    DecodedValue::Mapping(vec![("key".to_string(), key), ("value".to_string(), value)])
}
