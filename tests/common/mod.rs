//! Shared fixtures for integration tests
//!
//! - record builders encoding through `thrift_codec`
//! - `carbon_root`: scratch source tree with the IDL documents installed

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use carbon_inspect::value::DecodedValue;
use tempfile::TempDir;
use thrift_codec::data::{Field, List, Map, Struct};
use thrift_codec::BinaryEncode;

// =============================================================================
// IDL fixtures
// =============================================================================

pub const SCHEMA_IDL: &str = r#"
namespace java org.carbondata.format

enum DataType {
    STRING = 0,
    INT = 1,
    LONG = 2,
    DOUBLE = 3,
    DECIMAL = 4,
    TIMESTAMP = 5,
    ARRAY = 20,
    STRUCT = 21,
}

enum Encoding {
    DICTIONARY = 0,
    DELTA = 1,
    RLE = 2,
    INVERTED_INDEX = 3,
}

struct ColumnSchema {
    1: required DataType data_type;
    2: required string column_name;
    3: required string column_id;
    4: required bool columnar;
    5: required list<Encoding> encoders;
    6: required bool dimension;
    7: optional i32 column_group_id = -1;
    8: optional map<string, string> columnProperties;
}

struct SchemaEvolutionEntry {
    1: required i64 time_stamp;
    2: optional list<ColumnSchema> added;
    3: optional list<ColumnSchema> removed;
}

struct SchemaEvolution {
    1: required list<SchemaEvolutionEntry> schema_evolution_history;
}

struct TableSchema {
    1: required string table_id;
    2: required list<ColumnSchema> table_columns;
    3: required SchemaEvolution schema_evolution;
}

struct TableInfo {
    1: required TableSchema fact_table;
    2: required list<TableSchema> aggregate_table_list;
}
"#;

pub const DICTIONARY_IDL: &str = r#"
namespace java org.carbondata.format

struct ColumnDictionaryChunk {
    1: list<binary> values; // dictionary values, in surrogate key order
}
"#;

pub const DICTIONARY_META_IDL: &str = r#"
namespace java org.carbondata.format

struct ColumnDictionaryChunkMeta {
    1: required i32 min_surrogate_key;
    2: required i32 max_surrogate_key;
    3: required i64 start_offset;
    4: required i64 end_offset;
    5: required i32 chunk_count;
}
"#;

pub const SORT_INDEX_IDL: &str = r#"
namespace java org.carbondata.format

struct ColumnSortInfo {
    1: required list<i32> sort_index;
    2: optional list<i32> sort_index_inverted;
}
"#;

pub const CARBONDATA_IDL: &str = r#"
namespace java org.carbondata.format

include "schema.thrift"

struct BlockletBTreeIndex {
    1: required binary start_key;
    2: required binary end_key;
}

struct BlockletMinMaxIndex {
    1: required list<binary> min_values;
    2: required list<binary> max_values;
}

struct BlockletIndex {
    1: required BlockletMinMaxIndex min_max_index;
    2: required BlockletBTreeIndex b_tree_index;
}

struct SegmentInfo {
    1: required i32 num_cols;
    2: required list<i32> column_cardinalities;
}
"#;

pub const CARBONDATA_INDEX_IDL: &str = r#"
namespace java org.carbondata.format

include "schema.thrift"
include "carbondata.thrift"

struct IndexHeader {
    1: required i32 version;
    2: required list<schema.ColumnSchema> table_columns;
    3: required carbondata.SegmentInfo segment_info;
}

struct BlockIndex {
    1: required i64 num_rows;
    2: required string file_name;
    3: required i64 offset;
    4: required carbondata.BlockletIndex block_index;
}
"#;

/// All fixture documents as (logical name, IDL text)
pub const IDL_DOCUMENTS: [(&str, &str); 6] = [
    ("schema", SCHEMA_IDL),
    ("dictionary", DICTIONARY_IDL),
    ("dictionary_meta", DICTIONARY_META_IDL),
    ("sort_index", SORT_INDEX_IDL),
    ("carbondata", CARBONDATA_IDL),
    ("carbondataindex", CARBONDATA_INDEX_IDL),
];

/// Scratch source tree: `<root>/format/src/main/thrift/*.thrift`
pub fn carbon_root() -> TempDir {
    let root = TempDir::new().unwrap();
    let thrift_dir = thrift_dir(root.path());
    fs::create_dir_all(&thrift_dir).unwrap();
    for (name, idl) in IDL_DOCUMENTS {
        fs::write(thrift_dir.join(format!("{}.thrift", name)), idl).unwrap();
    }
    root
}

pub fn thrift_dir(root: &Path) -> PathBuf {
    root.join("format").join("src").join("main").join("thrift")
}

/// Writes `bytes` to `<dir>/<name>` and returns the path
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

// =============================================================================
// Record builders
// =============================================================================

/// Binary-protocol bytes of one struct
pub fn encode(record: &Struct) -> Vec<u8> {
    let mut buf = Vec::new();
    record.binary_encode(&mut buf).unwrap();
    buf
}

pub fn dictionary_meta(min: i32, max: i32, start: i64, end: i64, chunks: i32) -> Vec<u8> {
    encode(&Struct::new(vec![
        Field::new(1, min),
        Field::new(2, max),
        Field::new(3, start),
        Field::new(4, end),
        Field::new(5, chunks),
    ]))
}

pub fn dictionary_chunk(values: &[&[u8]]) -> Vec<u8> {
    let values: Vec<Vec<u8>> = values.iter().map(|v| v.to_vec()).collect();
    encode(&Struct::new(vec![Field::new(1, List::from(values))]))
}

pub fn sort_info(sort_index: &[i32], inverted: Option<&[i32]>) -> Vec<u8> {
    let mut fields = vec![Field::new(1, List::from(sort_index.to_vec()))];
    if let Some(inverted) = inverted {
        fields.push(Field::new(2, List::from(inverted.to_vec())));
    }
    encode(&Struct::new(fields))
}

/// `ColumnSchema` struct without `columnProperties`
pub fn column_schema(name: &str, data_type: i32, dimension: bool) -> Struct {
    Struct::new(column_fields(name, data_type, dimension))
}

/// `ColumnSchema` struct carrying a `columnProperties` map
pub fn column_schema_with_properties(
    name: &str,
    data_type: i32,
    properties: &[(&str, &str)],
) -> Struct {
    let mut fields = column_fields(name, data_type, true);
    let entries = properties
        .iter()
        .map(|(k, v)| (k.as_bytes().to_vec(), v.as_bytes().to_vec()));
    fields.push(Field::new(8, Map::new(entries)));
    Struct::new(fields)
}

fn column_fields(name: &str, data_type: i32, dimension: bool) -> Vec<Field> {
    vec![
        Field::new(1, data_type),
        Field::new(2, name),
        Field::new(3, format!("{}-id", name)),
        Field::new(4, true),
        Field::new(5, List::from(vec![0i32])),
        Field::new(6, dimension),
    ]
}

/// `TableInfo` with one fact table holding `columns` and no aggregates
pub fn table_info(table_id: &str, columns: &[(&str, i32, bool)]) -> Vec<u8> {
    let columns: Vec<Struct> = columns
        .iter()
        .map(|(name, data_type, dimension)| column_schema(name, *data_type, *dimension))
        .collect();
    let history = Struct::new(vec![Field::new(1, 1_700_000_000_000i64)]);
    let evolution = Struct::new(vec![Field::new(1, List::from(vec![history]))]);
    let fact_table = Struct::new(vec![
        Field::new(1, table_id),
        Field::new(2, List::from(columns)),
        Field::new(3, evolution),
    ]);
    encode(&Struct::new(vec![
        Field::new(1, fact_table),
        Field::new(2, List::from(Vec::<Struct>::new())),
    ]))
}

// =============================================================================
// Value helpers
// =============================================================================

/// Keys of a mapping value, in emitted order
pub fn mapping_keys(value: &DecodedValue) -> Vec<&str> {
    match value {
        DecodedValue::Mapping(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
        other => panic!("not a mapping: {:?}", other),
    }
}

/// A record as the JSON value it serializes to
pub fn json_of(value: &DecodedValue) -> serde_json::Value {
    serde_json::to_value(value).unwrap()
}
