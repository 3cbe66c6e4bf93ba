//! Decode failures
//!
//! A decode failure is an ordinary, inspectable value. The record stream
//! decoder turns it into "no more usable records"; nothing here aborts.

use std::io;

use thiserror::Error;

/// Result type for single-record decoding
pub type DecodeResult<T> = Result<T, DecodeFailure>;

/// Why one record could not be decoded.
///
/// `offset` is the byte offset where the failing record began, except for
/// `UnexpectedEof`, which reports where the stream ran out.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    #[error("unexpected end of stream at byte {offset}")]
    UnexpectedEof { offset: u64 },

    #[error("read error in record at byte {offset}: {source}")]
    Io {
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// The bytes are not a binary-protocol struct
    #[error("malformed record at byte {offset}: {reason}")]
    Protocol { offset: u64, reason: String },

    #[error("field {field} expects {expected}, found {found} (record at byte {offset})")]
    TypeMismatch {
        offset: u64,
        field: String,
        expected: String,
        found: &'static str,
    },

    #[error("nesting deeper than {limit} levels (record at byte {offset})")]
    DepthExceeded { offset: u64, limit: usize },

    #[error("type {name} is not declared in schema {schema} (record at byte {offset})")]
    UnknownType {
        offset: u64,
        name: String,
        schema: String,
    },
}

impl DecodeFailure {
    pub fn offset(&self) -> u64 {
        match self {
            DecodeFailure::UnexpectedEof { offset }
            | DecodeFailure::Io { offset, .. }
            | DecodeFailure::Protocol { offset, .. }
            | DecodeFailure::TypeMismatch { offset, .. }
            | DecodeFailure::DepthExceeded { offset, .. }
            | DecodeFailure::UnknownType { offset, .. } => *offset,
        }
    }

    /// Whether the stream simply ran out of bytes
    pub fn is_eof(&self) -> bool {
        matches!(self, DecodeFailure::UnexpectedEof { .. })
    }

    /// Short stable label, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeFailure::UnexpectedEof { .. } => "unexpected_eof",
            DecodeFailure::Io { .. } => "io",
            DecodeFailure::Protocol { .. } => "protocol",
            DecodeFailure::TypeMismatch { .. } => "type_mismatch",
            DecodeFailure::DepthExceeded { .. } => "depth_exceeded",
            DecodeFailure::UnknownType { .. } => "unknown_type",
        }
    }
}
