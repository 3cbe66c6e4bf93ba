//! Typed, schema-shaped result of decoding one record

use crate::schema::{ConstValue, FieldKind};

/// Value of one decoded field, shaped by its declared kind
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Byte(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Double(f64),
    String(String),
    /// `binary` fields, and `string` fields that are not valid UTF-8
    Binary(Vec<u8>),
    /// Enum member value as carried on the wire
    Enum(i32),
    List(Vec<FieldValue>),
    Set(Vec<FieldValue>),
    Map(Vec<(FieldValue, FieldValue)>),
    Struct(DecodedRecord),
}

impl FieldValue {
    /// Builds the value a field takes from its IDL default.
    ///
    /// Returns `None` when the constant does not fit the kind.
    pub fn from_const(value: &ConstValue, kind: &FieldKind) -> Option<Self> {
        match (kind, value) {
            (FieldKind::Bool, ConstValue::Bool(b)) => Some(FieldValue::Bool(*b)),
            (FieldKind::Bool, ConstValue::Int(i)) => Some(FieldValue::Bool(*i != 0)),
            (FieldKind::Byte, ConstValue::Int(i)) => i8::try_from(*i).ok().map(FieldValue::Byte),
            (FieldKind::I16, ConstValue::Int(i)) => i16::try_from(*i).ok().map(FieldValue::I16),
            (FieldKind::I32, ConstValue::Int(i)) => i32::try_from(*i).ok().map(FieldValue::I32),
            (FieldKind::Enum(_), ConstValue::Int(i)) => i32::try_from(*i).ok().map(FieldValue::Enum),
            (FieldKind::I64, ConstValue::Int(i)) => Some(FieldValue::I64(*i)),
            (FieldKind::Double, ConstValue::Double(d)) => Some(FieldValue::Double(*d)),
            (FieldKind::Double, ConstValue::Int(i)) => Some(FieldValue::Double(*i as f64)),
            (FieldKind::String, ConstValue::Str(s)) => Some(FieldValue::String(s.clone())),
            (FieldKind::Binary, ConstValue::Str(s)) => Some(FieldValue::Binary(s.as_bytes().to_vec())),
            (FieldKind::List(elem), ConstValue::List(items)) => items
                .iter()
                .map(|item| Self::from_const(item, elem))
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::List),
            (FieldKind::Set(elem), ConstValue::List(items)) => items
                .iter()
                .map(|item| Self::from_const(item, elem))
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::Set),
            (FieldKind::Map(key_kind, value_kind), ConstValue::Map(entries)) => entries
                .iter()
                .map(|(k, v)| Some((Self::from_const(k, key_kind)?, Self::from_const(v, value_kind)?)))
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::Map),
            _ => None,
        }
    }
}

/// One present field of a decoded record
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub name: String,
    pub value: FieldValue,
}

/// Decoded instance of a record type.
///
/// Fields appear in declaration order. Declared fields that were absent on
/// the wire and have no default are omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    /// Qualified record type name
    pub type_name: String,
    pub fields: Vec<DecodedField>,
}

#[cfg(test)]
impl DecodedRecord {
    /// Looks up a present field by name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}
