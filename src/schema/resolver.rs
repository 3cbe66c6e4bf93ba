//! Resolves a parsed `Document` into a `SchemaDefinition`
//!
//! Named types become `FieldKind::Enum`/`FieldKind::Struct` with qualified
//! names, typedefs are expanded, and identifier constants are replaced by
//! their values. Everything reachable through includes is merged in.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::parser::{Document, TypeExpr};
use super::types::{ConstValue, EnumType, FieldDescriptor, FieldKind, RecordType, SchemaDefinition};

/// Builds the definition for document `name` on top of its resolved includes
pub(crate) fn build_definition(
    name: &str,
    source: Option<PathBuf>,
    doc: Document,
    includes: &[Arc<SchemaDefinition>],
) -> SchemaResult<SchemaDefinition> {
    let mut definition = SchemaDefinition {
        name: name.to_string(),
        source,
        includes: includes.iter().map(|d| d.name.clone()).collect(),
        namespaces: doc.namespaces.clone(),
        record_types: HashMap::new(),
        enums: HashMap::new(),
        typedefs: HashMap::new(),
        constants: HashMap::new(),
    };

    for included in includes {
        definition.record_types.extend(included.record_types.clone());
        definition.enums.extend(included.enums.clone());
        definition.typedefs.extend(included.typedefs.clone());
        definition.constants.extend(included.constants.clone());
    }

    let mut local_names = HashSet::new();
    let declared = doc
        .enums
        .iter()
        .map(|e| &e.name)
        .chain(doc.records.iter().map(|r| &r.name))
        .chain(doc.typedefs.iter().map(|t| &t.name));
    for declared_name in declared {
        if !local_names.insert(declared_name.clone()) {
            return Err(SchemaError::malformed(
                name,
                format!("duplicate definition of {}", declared_name),
            ));
        }
    }

    for decl in &doc.enums {
        let key = definition.qualify(&decl.name);
        definition.enums.insert(
            key.clone(),
            EnumType { name: key, members: decl.members.clone() },
        );
    }

    let local_records: HashSet<String> =
        doc.records.iter().map(|r| definition.qualify(&r.name)).collect();
    let raw_typedefs: HashMap<String, (TypeExpr, usize)> = doc
        .typedefs
        .iter()
        .map(|t| (definition.qualify(&t.name), (t.ty.clone(), t.line)))
        .collect();

    let mut resolver = Resolver {
        definition: &mut definition,
        local_records: &local_records,
        raw_typedefs: &raw_typedefs,
        in_progress: Vec::new(),
    };

    for typedef in &doc.typedefs {
        let key = resolver.definition.qualify(&typedef.name);
        resolver.resolve_typedef(&key)?;
    }

    for constant in &doc.consts {
        let kind = resolver.resolve_type(&constant.ty, constant.line)?;
        let value = resolver.resolve_const(&constant.value, &kind, constant.line)?;
        let key = resolver.definition.qualify(&constant.name);
        resolver.definition.constants.insert(key, value);
    }

    let mut record_types = Vec::with_capacity(doc.records.len());
    for decl in &doc.records {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            let kind = resolver.resolve_type(&field.ty, field.line)?;
            let default = match &field.default {
                Some(value) => Some(resolver.resolve_const(value, &kind, field.line)?),
                None => None,
            };
            fields.push(FieldDescriptor {
                id: field.id,
                name: field.name.clone(),
                kind,
                requiredness: field.requiredness,
                default,
            });
        }
        record_types.push(RecordType {
            name: resolver.definition.qualify(&decl.name),
            document: name.to_string(),
            flavor: decl.flavor,
            fields,
        });
    }

    for record in record_types {
        definition.record_types.insert(record.name.clone(), record);
    }

    Ok(definition)
}

struct Resolver<'a> {
    definition: &'a mut SchemaDefinition,
    local_records: &'a HashSet<String>,
    raw_typedefs: &'a HashMap<String, (TypeExpr, usize)>,
    /// Typedefs currently being expanded, for cycle detection
    in_progress: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn resolve_type(&mut self, ty: &TypeExpr, line: usize) -> SchemaResult<FieldKind> {
        match ty {
            TypeExpr::Base(kind) => Ok(kind.clone()),
            TypeExpr::List(elem) => Ok(FieldKind::List(Box::new(self.resolve_type(elem, line)?))),
            TypeExpr::Set(elem) => Ok(FieldKind::Set(Box::new(self.resolve_type(elem, line)?))),
            TypeExpr::Map(key, value) => Ok(FieldKind::Map(
                Box::new(self.resolve_type(key, line)?),
                Box::new(self.resolve_type(value, line)?),
            )),
            TypeExpr::Named(type_name) => self.resolve_named(type_name, line),
        }
    }

    fn resolve_named(&mut self, type_name: &str, line: usize) -> SchemaResult<FieldKind> {
        let key = self.qualify_reference(type_name, line)?;

        if self.definition.typedefs.contains_key(&key) || self.raw_typedefs.contains_key(&key) {
            return self.resolve_typedef(&key);
        }
        if self.definition.enums.contains_key(&key) {
            return Ok(FieldKind::Enum(key));
        }
        if self.local_records.contains(&key) || self.definition.record_types.contains_key(&key) {
            return Ok(FieldKind::Struct(key));
        }

        Err(SchemaError::malformed_at_line(
            &self.definition.name,
            line,
            format!("unknown type {}", type_name),
        ))
    }

    /// Qualifies a type reference, checking that a prefix names this
    /// document or one of its includes
    fn qualify_reference(&self, type_name: &str, line: usize) -> SchemaResult<String> {
        match type_name.split_once('.') {
            None => Ok(self.definition.qualify(type_name)),
            Some((prefix, _)) => {
                let known = prefix == self.definition.name
                    || self.definition.includes.iter().any(|i| i == prefix);
                if known {
                    Ok(type_name.to_string())
                } else {
                    Err(SchemaError::malformed_at_line(
                        &self.definition.name,
                        line,
                        format!("type {} refers to a document that is not included", type_name),
                    ))
                }
            }
        }
    }

    fn resolve_typedef(&mut self, key: &str) -> SchemaResult<FieldKind> {
        if let Some(kind) = self.definition.typedefs.get(key) {
            return Ok(kind.clone());
        }
        let (ty, line) = match self.raw_typedefs.get(key) {
            Some(raw) => raw.clone(),
            None => {
                return Err(SchemaError::malformed(
                    &self.definition.name,
                    format!("unknown typedef {}", key),
                ))
            }
        };
        if self.in_progress.iter().any(|k| k == key) {
            return Err(SchemaError::malformed_at_line(
                &self.definition.name,
                line,
                format!("typedef cycle through {}", key),
            ));
        }

        self.in_progress.push(key.to_string());
        let kind = self.resolve_type(&ty, line);
        self.in_progress.pop();

        let kind = kind?;
        self.definition.typedefs.insert(key.to_string(), kind.clone());
        Ok(kind)
    }

    fn resolve_const(&self, value: &ConstValue, kind: &FieldKind, line: usize) -> SchemaResult<ConstValue> {
        match value {
            ConstValue::Ident(ident) => self.resolve_ident(ident, kind, line),
            ConstValue::List(items) => {
                let elem = match kind {
                    FieldKind::List(elem) | FieldKind::Set(elem) => elem.as_ref(),
                    other => other,
                };
                let items = items
                    .iter()
                    .map(|item| self.resolve_const(item, elem, line))
                    .collect::<SchemaResult<Vec<_>>>()?;
                Ok(ConstValue::List(items))
            }
            ConstValue::Map(entries) => {
                let (key_kind, value_kind) = match kind {
                    FieldKind::Map(k, v) => (k.as_ref(), v.as_ref()),
                    other => (other, other),
                };
                let entries = entries
                    .iter()
                    .map(|(k, v)| {
                        Ok((
                            self.resolve_const(k, key_kind, line)?,
                            self.resolve_const(v, value_kind, line)?,
                        ))
                    })
                    .collect::<SchemaResult<Vec<_>>>()?;
                Ok(ConstValue::Map(entries))
            }
            other => Ok(other.clone()),
        }
    }

    fn resolve_ident(&self, ident: &str, kind: &FieldKind, line: usize) -> SchemaResult<ConstValue> {
        if let FieldKind::Enum(enum_name) = kind {
            let member = ident.rsplit('.').next().unwrap_or(ident);
            if let Some(value) = self
                .definition
                .lookup_enum(enum_name)
                .and_then(|e| e.value_of(member))
            {
                return Ok(ConstValue::Int(i64::from(value)));
            }
        }

        if let Some(value) = self.definition.lookup_constant(&self.definition.qualify(ident)) {
            return Ok(value.clone());
        }

        Err(SchemaError::malformed_at_line(
            &self.definition.name,
            line,
            format!("unresolved constant {}", ident),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parser::parse_document;
    use crate::schema::types::Requiredness;

    fn build(name: &str, source: &str, includes: &[Arc<SchemaDefinition>]) -> SchemaResult<SchemaDefinition> {
        build_definition(name, None, parse_document(name, source)?, includes)
    }

    const SCHEMA: &str = r#"
        enum DataType { STRING = 0, INT = 1, LONG = 2 }
        typedef i64 Timestamp
        struct ColumnSchema {
            1: required DataType data_type = DataType.INT;
            2: required string column_name;
            3: optional map<string, string> column_properties;
        }
        struct SchemaEvolutionEntry {
            1: required Timestamp time_stamp;
            2: optional list<ColumnSchema> added;
        }
    "#;

    #[test]
    fn test_resolves_local_types() {
        let def = build("schema", SCHEMA, &[]).unwrap();
        let entry = def.record_type("SchemaEvolutionEntry").unwrap();
        assert_eq!(entry.fields[0].kind, FieldKind::I64);
        assert_eq!(
            entry.fields[1].kind,
            FieldKind::List(Box::new(FieldKind::Struct("schema.ColumnSchema".into())))
        );

        let column = def.record_type("schema.ColumnSchema").unwrap();
        assert_eq!(column.fields[0].kind, FieldKind::Enum("schema.DataType".into()));
        assert_eq!(column.fields[0].default, Some(ConstValue::Int(1)));
        assert_eq!(column.fields[0].requiredness, Requiredness::Required);
    }

    #[test]
    fn test_resolves_included_types() {
        let schema = Arc::new(build("schema", SCHEMA, &[]).unwrap());
        let index = build(
            "carbondataindex",
            r#"
                include "schema.thrift"
                struct IndexHeader {
                    1: required list<schema.ColumnSchema> table_columns;
                    2: optional schema.Timestamp created;
                }
            "#,
            &[schema],
        )
        .unwrap();

        let header = index.record_type("IndexHeader").unwrap();
        assert_eq!(header.name, "carbondataindex.IndexHeader");
        assert_eq!(header.fields[1].kind, FieldKind::I64);
        assert!(index.lookup_record("schema.ColumnSchema").is_some());
        assert_eq!(index.includes, vec!["schema".to_string()]);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = build("t", "struct A { 1: Missing m }", &[]).unwrap_err();
        assert!(err.to_string().contains("unknown type Missing"));
    }

    #[test]
    fn test_reference_to_unincluded_document_rejected() {
        let err = build("t", "struct A { 1: other.Thing m }", &[]).unwrap_err();
        assert!(err.to_string().contains("not included"));
    }

    #[test]
    fn test_typedef_cycle_rejected() {
        let err = build("t", "typedef B A\ntypedef A B\nstruct S { 1: A a }", &[]).unwrap_err();
        assert!(err.to_string().contains("typedef cycle"));
    }

    #[test]
    fn test_constant_defaults() {
        let def = build(
            "t",
            "const i32 VERSION = 3\nstruct S { 1: i32 v = VERSION; 2: list<i32> l = [VERSION, 4] }",
            &[],
        )
        .unwrap();
        let s = def.record_type("S").unwrap();
        assert_eq!(s.fields[0].default, Some(ConstValue::Int(3)));
        assert_eq!(
            s.fields[1].default,
            Some(ConstValue::List(vec![ConstValue::Int(3), ConstValue::Int(4)]))
        );
    }

    #[test]
    fn test_unresolved_constant_rejected() {
        let err = build("t", "struct S { 1: i32 v = NOPE }", &[]).unwrap_err();
        assert!(err.to_string().contains("unresolved constant NOPE"));
    }

    #[test]
    fn test_unknown_record_lookup() {
        let def = build("schema", SCHEMA, &[]).unwrap();
        let err = def.record_type("TableInfo").unwrap_err();
        assert_eq!(err.code().code(), "CARBON_SCHEMA_UNKNOWN_RECORD");
    }
}
