//! Binary record reader
//!
//! Decodes exactly one record of a given type from the current stream
//! position. The Thrift binary protocol itself is handled by `thrift_codec`;
//! this module counts the bytes the codec consumes and then shapes the
//! untyped struct it returns against a `RecordType`.
//!
//! Any structural inconsistency is returned as a `DecodeFailure`.

use std::io::{self, Read};

use thrift_codec::data::{DataKind, DataRef, Elements, Struct};
use thrift_codec::BinaryDecode;

use crate::schema::{FieldKind, RecordType, SchemaDefinition};

use super::errors::{DecodeFailure, DecodeResult};
use super::record::{DecodedField, DecodedRecord, FieldValue};

/// Maximum struct/container nesting
pub const MAX_DEPTH: usize = 64;

/// A successfully decoded record and the stream position after it
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub record: DecodedRecord,
    pub position: u64,
}

/// Result of one `read_one` call
pub type DecodeOutcome = DecodeResult<Decoded>;

/// Reads records of a schema from a byte stream.
///
/// Tracks the byte position itself so callers can observe progress without
/// requiring `Seek`.
pub struct BinaryRecordReader<'s, R> {
    input: R,
    /// Bytes consumed from `input` so far
    position: u64,
    /// Resolves nested struct types
    schema: &'s SchemaDefinition,
}

impl<'s, R: Read> BinaryRecordReader<'s, R> {
    /// Creates a reader positioned at the start of `input`.
    pub fn new(input: R, schema: &'s SchemaDefinition) -> Self {
        Self {
            input,
            position: 0,
            schema,
        }
    }

    /// Returns the current byte position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Decodes one record of `record_type` at the current position.
    ///
    /// On success the position has advanced by exactly the bytes the record
    /// occupies. On failure the position is wherever decoding stopped.
    pub fn read_one(&mut self, record_type: &RecordType) -> DecodeOutcome {
        let start = self.position;

        let (decoded, consumed, exhausted, io_error) = {
            let mut counting = CountingReader::new(&mut self.input);
            let decoded = Struct::binary_decode(&mut counting);
            (decoded, counting.consumed, counting.exhausted, counting.error.take())
        };
        self.position += consumed;

        let data = decoded.map_err(|e| match io_error {
            Some(source) => DecodeFailure::Io {
                offset: start,
                source,
            },
            None if exhausted => DecodeFailure::UnexpectedEof {
                offset: self.position,
            },
            None => DecodeFailure::Protocol {
                offset: start,
                reason: first_line(&e.to_string()),
            },
        })?;

        let shaper = RecordShaper {
            schema: self.schema,
            start,
        };
        let record = shaper.record(&data, record_type, 0)?;
        Ok(Decoded {
            record,
            position: self.position,
        })
    }
}

/// Counts bytes handed to the codec and remembers why reading stopped
struct CountingReader<'a, R> {
    inner: &'a mut R,
    consumed: u64,
    /// The inner reader returned no bytes for a non-empty read
    exhausted: bool,
    /// First I/O error from the inner reader
    error: Option<io::Error>,
}

impl<'a, R: Read> CountingReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self {
            inner,
            consumed: 0,
            exhausted: false,
            error: None,
        }
    }
}

impl<R: Read> Read for CountingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            Ok(0) if !buf.is_empty() => {
                self.exhausted = true;
                Ok(0)
            }
            Ok(n) => {
                self.consumed += n as u64;
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(e),
            Err(e) => {
                let kind = e.kind();
                self.error.get_or_insert(e);
                Err(io::Error::from(kind))
            }
        }
    }
}

/// Codec errors carry a multi-line history; the first line names the cause
fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}

/// Shapes a decoded wire struct by a record type
struct RecordShaper<'s> {
    schema: &'s SchemaDefinition,
    /// Byte offset of the record being shaped, reported in failures
    start: u64,
}

impl RecordShaper<'_> {
    fn record(&self, data: &Struct, record_type: &RecordType, depth: usize) -> DecodeResult<DecodedRecord> {
        self.check_depth(depth)?;

        let mut slots: Vec<Option<FieldValue>> = vec![None; record_type.fields.len()];

        for field in data.fields() {
            // Undeclared ids come from newer writers; the codec already read past them
            let Some((index, descriptor)) = record_type.field_by_id(field.id()) else {
                continue;
            };
            let label = format!("{}.{}", record_type.name, descriptor.name);
            let value = self.value(field.data().as_ref(), &descriptor.kind, &label, depth + 1)?;
            slots[index] = Some(value);
        }

        let fields = record_type
            .fields
            .iter()
            .zip(slots)
            .filter_map(|(descriptor, slot)| {
                let value = match slot {
                    Some(value) => value,
                    None => FieldValue::from_const(descriptor.default.as_ref()?, &descriptor.kind)?,
                };
                Some(DecodedField {
                    name: descriptor.name.clone(),
                    value,
                })
            })
            .collect();

        Ok(DecodedRecord {
            type_name: record_type.name.clone(),
            fields,
        })
    }

    fn value(&self, data: DataRef<'_>, kind: &FieldKind, label: &str, depth: usize) -> DecodeResult<FieldValue> {
        self.check_depth(depth)?;

        let value = match (kind, data) {
            (FieldKind::Bool, DataRef::Bool(v)) => FieldValue::Bool(*v),
            (FieldKind::Byte, DataRef::I8(v)) => FieldValue::Byte(*v),
            (FieldKind::I16, DataRef::I16(v)) => FieldValue::I16(*v),
            (FieldKind::I32, DataRef::I32(v)) => FieldValue::I32(*v),
            (FieldKind::Enum(_), DataRef::I32(v)) => FieldValue::Enum(*v),
            (FieldKind::I64, DataRef::I64(v)) => FieldValue::I64(*v),
            (FieldKind::Double, DataRef::Double(v)) => FieldValue::Double(*v),
            (FieldKind::String, DataRef::Binary(bytes)) => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => FieldValue::String(text),
                Err(e) => FieldValue::Binary(e.into_bytes()),
            },
            (FieldKind::Binary, DataRef::Binary(bytes)) => FieldValue::Binary(bytes.to_vec()),
            (FieldKind::List(elem), DataRef::List(list)) => {
                FieldValue::List(self.elements(list, elem, label, depth)?)
            }
            (FieldKind::Set(elem), DataRef::Set(set)) => {
                FieldValue::Set(self.elements(set, elem, label, depth)?)
            }
            (FieldKind::Map(key_kind, value_kind), DataRef::Map(map)) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map.iter() {
                    let key = self.value(key, key_kind, label, depth + 1)?;
                    let value = self.value(value, value_kind, label, depth + 1)?;
                    entries.push((key, value));
                }
                FieldValue::Map(entries)
            }
            (FieldKind::Struct(type_name), DataRef::Struct(nested)) => {
                let nested_type = self.schema.lookup_record(type_name).ok_or_else(|| {
                    DecodeFailure::UnknownType {
                        offset: self.start,
                        name: type_name.clone(),
                        schema: self.schema.name.clone(),
                    }
                })?;
                FieldValue::Struct(self.record(nested, nested_type, depth)?)
            }
            (expected, found) => {
                return Err(DecodeFailure::TypeMismatch {
                    offset: self.start,
                    field: label.to_string(),
                    expected: expected.type_name(),
                    found: wire_name(found.kind()),
                })
            }
        };
        Ok(value)
    }

    fn elements(&self, items: &Elements, elem: &FieldKind, label: &str, depth: usize) -> DecodeResult<Vec<FieldValue>> {
        items
            .iter()
            .map(|item| self.value(item, elem, label, depth + 1))
            .collect()
    }

    fn check_depth(&self, depth: usize) -> DecodeResult<()> {
        if depth > MAX_DEPTH {
            return Err(DecodeFailure::DepthExceeded {
                offset: self.start,
                limit: MAX_DEPTH,
            });
        }
        Ok(())
    }
}

/// IDL spelling of a wire type, for mismatch messages
fn wire_name(kind: DataKind) -> &'static str {
    match kind {
        DataKind::Bool => "bool",
        DataKind::I8 => "byte",
        DataKind::I16 => "i16",
        DataKind::I32 => "i32",
        DataKind::I64 => "i64",
        DataKind::Double => "double",
        DataKind::Binary => "string",
        DataKind::Struct => "struct",
        DataKind::Map => "map",
        DataKind::Set => "set",
        DataKind::List => "list",
    }
}
