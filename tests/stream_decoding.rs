//! Stream Decoding Tests
//!
//! Record stream behavior over real IDL documents:
//! - N well-formed records decode to N value trees, in order
//! - An empty stream yields nothing after one attempt
//! - A truncated tail is dropped silently
//! - Garbage yields an empty result
//! - Maps come out as key/value entry lists
//! - Decoding is deterministic

mod common;

use std::fs;

use carbon_inspect::scan::{RecordStreamDecoder, StopReason};
use carbon_inspect::schema::SchemaCatalog;
use carbon_inspect::value::DecodedValue;
use thrift_codec::data::{Field, List, Map, Struct};

use common::*;

fn catalog() -> (tempfile::TempDir, SchemaCatalog) {
    let root = carbon_root();
    let catalog = SchemaCatalog::for_root(root.path());
    (root, catalog)
}

// =============================================================================
// Well-formed streams
// =============================================================================

#[test]
fn test_dictionary_meta_records_in_order() {
    let (_root, mut catalog) = catalog();
    let schema = catalog.resolve("dictionary_meta").unwrap();
    let meta = schema.record_type("ColumnDictionaryChunkMeta").unwrap();

    let mut bytes = Vec::new();
    for i in 0..5 {
        bytes.extend(dictionary_meta(i * 10 + 1, i * 10 + 10, i as i64 * 64, i as i64 * 64 + 64, 1));
    }

    let outcome = RecordStreamDecoder::new(&schema).scan(bytes.as_slice(), meta);
    assert_eq!(outcome.records.len(), 5);
    assert!(matches!(outcome.stop, StopReason::EndOfStream));

    for (i, record) in outcome.records.iter().enumerate() {
        assert_eq!(
            mapping_keys(record),
            vec![
                "min_surrogate_key",
                "max_surrogate_key",
                "start_offset",
                "end_offset",
                "chunk_count"
            ]
        );
        assert_eq!(json_of(record)["min_surrogate_key"], i as i64 * 10 + 1);
    }
}

#[test]
fn test_dictionary_values_are_base64() {
    let (_root, mut catalog) = catalog();
    let schema = catalog.resolve("dictionary").unwrap();
    let chunk = schema.record_type("ColumnDictionaryChunk").unwrap();

    let bytes = dictionary_chunk(&[b"carbon", b"\x00\xff"]);
    let records = RecordStreamDecoder::new(&schema).decode_all(bytes.as_slice(), chunk);

    assert_eq!(records.len(), 1);
    let json = json_of(&records[0]);
    assert_eq!(json["values"][0], "Y2FyYm9u");
    assert_eq!(json["values"][1], "AP8=");
}

#[test]
fn test_table_info_nested_structs() {
    let (_root, mut catalog) = catalog();
    let schema = catalog.resolve("schema").unwrap();
    let table_info = schema.record_type("TableInfo").unwrap();

    let bytes = table_info_bytes();
    let records = RecordStreamDecoder::new(&schema).decode_all(bytes.as_slice(), table_info);
    assert_eq!(records.len(), 1);

    let json = json_of(&records[0]);
    let fact = &json["fact_table"];
    assert_eq!(fact["table_id"], "t-001");
    assert_eq!(fact["table_columns"][0]["column_name"], "name");
    assert_eq!(fact["table_columns"][1]["data_type"], 1);
    // Optional field with an IDL default is filled in
    assert_eq!(fact["table_columns"][0]["column_group_id"], -1);
    assert!(fact["table_columns"][0].get("columnProperties").is_none());
    assert_eq!(
        fact["schema_evolution"]["schema_evolution_history"][0]["time_stamp"],
        1_700_000_000_000i64
    );
    assert_eq!(json["aggregate_table_list"], serde_json::json!([]));
}

fn table_info_bytes() -> Vec<u8> {
    table_info("t-001", &[("name", 0, true), ("age", 1, false)])
}

#[test]
fn test_index_header_resolves_included_types() {
    let (_root, mut catalog) = catalog();
    let schema = catalog.resolve("carbondataindex").unwrap();
    let header = schema.record_type("IndexHeader").unwrap();

    let segment_info = Struct::new(vec![
        Field::new(1, 1i32),
        Field::new(2, List::from(vec![42i32])),
    ]);
    let bytes = encode(&Struct::new(vec![
        Field::new(1, 1i32),
        Field::new(2, List::from(vec![column_schema("id", 1, true)])),
        Field::new(3, segment_info),
    ]));

    let records = RecordStreamDecoder::new(&schema).decode_all(bytes.as_slice(), header);
    assert_eq!(records.len(), 1);
    let json = json_of(&records[0]);
    assert_eq!(json["table_columns"][0]["column_name"], "id");
    assert_eq!(json["segment_info"]["column_cardinalities"][0], 42);
    assert!(catalog.is_cached("schema"));
    assert!(catalog.is_cached("carbondata"));
}

// =============================================================================
// Stop policy
// =============================================================================

#[test]
fn test_empty_stream_single_attempt() {
    let (_root, mut catalog) = catalog();
    let schema = catalog.resolve("sort_index").unwrap();
    let sort_info = schema.record_type("ColumnSortInfo").unwrap();

    let outcome = RecordStreamDecoder::new(&schema).scan(&[0u8; 0][..], sort_info);
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.attempts, 1);
    assert!(matches!(outcome.stop, StopReason::EndOfStream));
}

#[test]
fn test_truncated_tail_is_dropped() {
    let (_root, mut catalog) = catalog();
    let schema = catalog.resolve("sort_index").unwrap();
    let sort_info_type = schema.record_type("ColumnSortInfo").unwrap();

    let mut bytes = sort_info(&[1, 0, 2], Some(&[1, 0, 2]));
    bytes.extend(sort_info(&[0, 1], None));
    let tail = sort_info(&[3, 2, 1, 0], None);
    bytes.extend_from_slice(&tail[..tail.len() - 3]);

    let outcome = RecordStreamDecoder::new(&schema).scan(bytes.as_slice(), sort_info_type);
    assert_eq!(outcome.records.len(), 2);
    assert!(matches!(outcome.stop, StopReason::TrailingBytes { .. }));
    assert!(json_of(&outcome.records[1]).get("sort_index_inverted").is_none());
}

#[test]
fn test_garbage_first_bytes() {
    let (_root, mut catalog) = catalog();
    let schema = catalog.resolve("dictionary_meta").unwrap();
    let meta = schema.record_type("ColumnDictionaryChunkMeta").unwrap();

    // Declared field 1 is i32; a string header there is a mismatch
    let bytes = encode(&Struct::new(vec![Field::new(1, "oops")]));
    let records = RecordStreamDecoder::new(&schema).decode_all(bytes.as_slice(), meta);
    assert!(records.is_empty());

    let records = RecordStreamDecoder::new(&schema).decode_all(&[0xEEu8, 0x01, 0x02][..], meta);
    assert!(records.is_empty());
}

#[test]
fn test_unknown_fields_are_skipped() {
    let (_root, mut catalog) = catalog();
    let schema = catalog.resolve("sort_index").unwrap();
    let sort_info_type = schema.record_type("ColumnSortInfo").unwrap();

    let extra = Map::new(vec![(b"ratio".to_vec(), 0.5f64)].into_iter());
    let bytes = encode(&Struct::new(vec![
        Field::new(9, extra),
        Field::new(1, List::from(vec![7i32])),
    ]));

    let records = RecordStreamDecoder::new(&schema).decode_all(bytes.as_slice(), sort_info_type);
    assert_eq!(records.len(), 1);
    assert_eq!(mapping_keys(&records[0]), vec!["sort_index"]);
}

// =============================================================================
// Maps
// =============================================================================

#[test]
fn test_map_field_emits_key_value_entries() {
    let (_root, mut catalog) = catalog();
    let schema = catalog.resolve("schema").unwrap();
    let column_type = schema.record_type("ColumnSchema").unwrap();

    let column = column_schema_with_properties("city", 0, &[("sort_columns", "true"), ("1", "numeric")]);
    let records = RecordStreamDecoder::new(&schema).decode_all(encode(&column).as_slice(), column_type);
    assert_eq!(records.len(), 1);

    let json = json_of(&records[0]);
    assert_eq!(
        json["columnProperties"],
        serde_json::json!([
            { "key": "sort_columns", "value": "true" },
            { "key": "1", "value": "numeric" }
        ])
    );
}

#[test]
fn test_map_entries_keep_wire_order_in_output() {
    let (_root, mut catalog) = catalog();
    let schema = catalog.resolve("schema").unwrap();
    let column_type = schema.record_type("ColumnSchema").unwrap();

    let column = column_schema_with_properties("c", 0, &[("zeta", "1"), ("alpha", "2")]);
    let records = RecordStreamDecoder::new(&schema).decode_all(encode(&column).as_slice(), column_type);

    let entries = match &records[0] {
        DecodedValue::Mapping(fields) => fields
            .iter()
            .find(|(name, _)| name == "columnProperties")
            .map(|(_, value)| value.clone())
            .unwrap(),
        other => panic!("unexpected record: {:?}", other),
    };
    let rendered = serde_json::to_string(&entries).unwrap();
    assert_eq!(
        rendered,
        r#"[{"key":"zeta","value":"1"},{"key":"alpha","value":"2"}]"#
    );
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_file_same_json() {
    let (root, mut catalog) = catalog();
    let schema = catalog.resolve("schema").unwrap();
    let table_info_type = schema.record_type("TableInfo").unwrap();
    let path = write_file(root.path(), "schema", &table_info_bytes());

    let decoder = RecordStreamDecoder::new(&schema);
    let first: Vec<DecodedValue> = decoder.decode_file(&path, table_info_type).unwrap().records;
    let second: Vec<DecodedValue> = decoder.decode_file(&path, table_info_type).unwrap().records;

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec_pretty(&first).unwrap(),
        serde_json::to_vec_pretty(&second).unwrap()
    );
    assert_eq!(fs::read(&path).unwrap(), table_info_bytes());
}
