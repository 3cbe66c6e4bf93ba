//! Wire decoding for carbon-inspect
//!
//! Every binary metadata file is a back-to-back sequence of records in the
//! Thrift binary protocol. This module decodes one record at a time with
//! `thrift_codec` and shapes it by a resolved record type; the stream-level
//! policy lives in `scan`.

mod errors;
mod reader;
mod record;

pub use errors::{DecodeFailure, DecodeResult};
pub use reader::{BinaryRecordReader, DecodeOutcome, Decoded};
pub use record::{DecodedField, DecodedRecord, FieldValue};
