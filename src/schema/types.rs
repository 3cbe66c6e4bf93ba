//! Schema type definitions
//!
//! A `SchemaDefinition` is the resolved form of one Thrift IDL document plus
//! everything it includes. All type keys are qualified as `<document>.<Name>`
//! so that types from included documents never collide with local ones.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use super::errors::{SchemaError, SchemaResult};

/// Kind tag of a field, with typedefs already resolved away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Byte,
    I16,
    I32,
    I64,
    Double,
    /// Text; decoded as UTF-8 when possible
    String,
    /// Opaque bytes
    Binary,
    /// Enum, carried on the wire as i32. Holds the qualified enum name.
    Enum(String),
    List(Box<FieldKind>),
    Set(Box<FieldKind>),
    Map(Box<FieldKind>, Box<FieldKind>),
    /// Nested record. Holds the qualified record type name.
    Struct(String),
}

impl FieldKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> String {
        match self {
            FieldKind::Bool => "bool".into(),
            FieldKind::Byte => "byte".into(),
            FieldKind::I16 => "i16".into(),
            FieldKind::I32 => "i32".into(),
            FieldKind::I64 => "i64".into(),
            FieldKind::Double => "double".into(),
            FieldKind::String => "string".into(),
            FieldKind::Binary => "binary".into(),
            FieldKind::Enum(name) | FieldKind::Struct(name) => name.clone(),
            FieldKind::List(elem) => format!("list<{}>", elem.type_name()),
            FieldKind::Set(elem) => format!("set<{}>", elem.type_name()),
            FieldKind::Map(key, value) => {
                format!("map<{},{}>", key.type_name(), value.type_name())
            }
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Field requiredness as written in the IDL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requiredness {
    Required,
    Optional,
    /// No qualifier given
    Default,
}

/// Constant value from the IDL (field defaults and `const` definitions)
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    /// Reference to a constant or enum member, resolved at load time
    Ident(String),
    List(Vec<ConstValue>),
    Map(Vec<(ConstValue, ConstValue)>),
}

/// One field of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub id: i16,
    pub name: String,
    pub kind: FieldKind,
    pub requiredness: Requiredness,
    /// Value the field takes when absent on the wire
    pub default: Option<ConstValue>,
}

/// Flavor of a record declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFlavor {
    Struct,
    Union,
    Exception,
}

/// Ordered set of field descriptors describing one decodable struct shape
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    /// Qualified name, `<document>.<Name>`
    pub name: String,
    /// Declaring document's logical name
    pub document: String,
    pub flavor: RecordFlavor,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl RecordType {
    /// Finds a field by wire id, returning its declaration index
    pub fn field_by_id(&self, id: i16) -> Option<(usize, &FieldDescriptor)> {
        self.fields.iter().enumerate().find(|(_, f)| f.id == id)
    }
}

/// Enum declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Qualified name, `<document>.<Name>`
    pub name: String,
    /// Members in declaration order
    pub members: Vec<(String, i32)>,
}

impl EnumType {
    /// Looks up a member's value by name
    pub fn value_of(&self, member: &str) -> Option<i32> {
        self.members
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, value)| *value)
    }
}

/// Resolved IDL document plus everything reachable through its includes.
///
/// Immutable once built; shared through `Arc` by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    /// Logical name, e.g. `dictionary_meta`
    pub name: String,
    /// File the document was read from, `None` for registered sources
    pub source: Option<PathBuf>,
    /// Logical names of directly included documents
    pub includes: Vec<String>,
    /// `namespace` declarations as (scope, namespace)
    pub namespaces: Vec<(String, String)>,
    pub(crate) record_types: HashMap<String, RecordType>,
    pub(crate) enums: HashMap<String, EnumType>,
    pub(crate) typedefs: HashMap<String, FieldKind>,
    pub(crate) constants: HashMap<String, ConstValue>,
}

impl SchemaDefinition {
    /// Qualifies a bare name with this document's name; qualified names pass through
    pub fn qualify(&self, name: &str) -> String {
        if name.contains('.') {
            name.to_string()
        } else {
            format!("{}.{}", self.name, name)
        }
    }

    /// Looks up a record type by bare or qualified name.
    ///
    /// Fails with `CARBON_SCHEMA_UNKNOWN_RECORD` when absent.
    pub fn record_type(&self, name: &str) -> SchemaResult<&RecordType> {
        let key = self.qualify(name);
        self.record_types
            .get(&key)
            .ok_or_else(|| SchemaError::unknown_record(&self.name, name))
    }

    /// Looks up a record type by qualified name
    pub fn lookup_record(&self, qualified: &str) -> Option<&RecordType> {
        self.record_types.get(qualified)
    }

    /// Looks up an enum by qualified name
    pub fn lookup_enum(&self, qualified: &str) -> Option<&EnumType> {
        self.enums.get(qualified)
    }

    /// Looks up a constant by qualified name
    pub fn lookup_constant(&self, qualified: &str) -> Option<&ConstValue> {
        self.constants.get(qualified)
    }

    /// Qualified names of all reachable record types, sorted
    pub fn record_type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.record_types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of reachable record types
    pub fn record_type_count(&self) -> usize {
        self.record_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> RecordType {
        RecordType {
            name: "sort_index.ColumnSortInfo".into(),
            document: "sort_index".into(),
            flavor: RecordFlavor::Struct,
            fields: vec![
                FieldDescriptor {
                    id: 1,
                    name: "sort_index".into(),
                    kind: FieldKind::List(Box::new(FieldKind::I32)),
                    requiredness: Requiredness::Required,
                    default: None,
                },
                FieldDescriptor {
                    id: 2,
                    name: "sort_index_inverted".into(),
                    kind: FieldKind::List(Box::new(FieldKind::I32)),
                    requiredness: Requiredness::Optional,
                    default: None,
                },
            ],
        }
    }

    #[test]
    fn test_field_by_id() {
        let record = sample_record();
        let (index, field) = record.field_by_id(2).unwrap();
        assert_eq!(index, 1);
        assert_eq!(field.name, "sort_index_inverted");
        assert!(record.field_by_id(9).is_none());
    }

    #[test]
    fn test_type_names() {
        let kind = FieldKind::Map(
            Box::new(FieldKind::String),
            Box::new(FieldKind::List(Box::new(FieldKind::Struct("schema.ColumnSchema".into())))),
        );
        assert_eq!(kind.type_name(), "map<string,list<schema.ColumnSchema>>");
    }

    #[test]
    fn test_enum_value_of() {
        let e = EnumType {
            name: "schema.Encoding".into(),
            members: vec![("DICTIONARY".into(), 0), ("RLE".into(), 1)],
        };
        assert_eq!(e.value_of("RLE"), Some(1));
        assert_eq!(e.value_of("DELTA"), None);
    }
}
