//! Record stream decoder
//!
//! Drives the read loop over a stream of back-to-back records:
//!
//! 1. Remember the position, read one record
//! 2. Success: convert and keep it; stop if the position did not move
//! 3. Failure: stop and keep everything decoded so far
//!
//! A failure is never surfaced as an error. The format has no marker that
//! tells a clean end from a corrupt tail, so both end the scan the same way.
//! `StopReason` records which one it looked like, for logs only.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{RecordType, SchemaDefinition};
use crate::value::{to_value_tree, DecodedValue};
use crate::wire::{BinaryRecordReader, DecodeFailure};

/// Why a scan ended
#[derive(Debug)]
pub enum StopReason {
    /// The stream ran out exactly at a record boundary
    EndOfStream,
    /// A read succeeded without consuming bytes
    NoProgress { offset: u64 },
    /// Bytes after the last good record did not decode
    TrailingBytes { offset: u64, failure: DecodeFailure },
}

impl StopReason {
    pub fn label(&self) -> &'static str {
        match self {
            StopReason::EndOfStream => "end_of_stream",
            StopReason::NoProgress { .. } => "no_progress",
            StopReason::TrailingBytes { .. } => "trailing_bytes",
        }
    }
}

/// Records decoded by one scan plus how the scan ended
#[derive(Debug)]
pub struct ScanOutcome {
    /// Value trees in file order
    pub records: Vec<DecodedValue>,
    /// Number of `read_one` calls made
    pub attempts: usize,
    /// Bytes consumed by successfully decoded records
    pub bytes_consumed: u64,
    pub stop: StopReason,
}

/// Decodes every record of one type from a stream.
pub struct RecordStreamDecoder<'s> {
    schema: &'s SchemaDefinition,
}

impl<'s> RecordStreamDecoder<'s> {
    /// Creates a decoder resolving nested types through `schema`.
    pub fn new(schema: &'s SchemaDefinition) -> Self {
        Self { schema }
    }

    /// Decodes records until the stream stops yielding them.
    ///
    /// Returns the best-effort partial result; never fails.
    pub fn decode_all<R: Read>(&self, input: R, record_type: &RecordType) -> Vec<DecodedValue> {
        self.scan(input, record_type).records
    }

    /// Same loop as `decode_all`, also reporting why it stopped.
    pub fn scan<R: Read>(&self, input: R, record_type: &RecordType) -> ScanOutcome {
        let mut reader = BinaryRecordReader::new(input, self.schema);
        let mut records = Vec::new();
        let mut attempts = 0;

        let stop = loop {
            let start = reader.position();
            attempts += 1;

            match reader.read_one(record_type) {
                Ok(decoded) => {
                    records.push(to_value_tree(&decoded.record));
                    if decoded.position == start {
                        break StopReason::NoProgress { offset: start };
                    }
                }
                Err(failure) => {
                    let clean = failure.is_eof() && reader.position() == start;
                    break if clean {
                        StopReason::EndOfStream
                    } else {
                        StopReason::TrailingBytes { offset: start, failure }
                    };
                }
            }
        };

        let bytes_consumed = match &stop {
            StopReason::EndOfStream => reader.position(),
            StopReason::NoProgress { offset } | StopReason::TrailingBytes { offset, .. } => *offset,
        };

        ScanOutcome {
            records,
            attempts,
            bytes_consumed,
            stop,
        }
    }

    /// Opens `path` and scans it.
    ///
    /// The file is closed before returning on every path. Only opening the
    /// file can fail.
    pub fn decode_file(&self, path: &Path, record_type: &RecordType) -> io::Result<ScanOutcome> {
        let file = File::open(path)?;
        let file_label = path.display().to_string();

        log_event_with_fields(
            Event::ScanStart,
            &[("file", &file_label), ("record_type", &record_type.name)],
        );

        let outcome = self.scan(BufReader::new(file), record_type);

        let records = outcome.records.len().to_string();
        let consumed = outcome.bytes_consumed.to_string();
        match &outcome.stop {
            StopReason::TrailingBytes { offset, failure } => {
                let offset = offset.to_string();
                let reason = failure.to_string();
                log_event_with_fields(
                    Event::ScanStoppedEarly,
                    &[
                        ("file", &file_label),
                        ("records", &records),
                        ("offset", &offset),
                        ("failure", failure.kind()),
                        ("reason", &reason),
                    ],
                );
            }
            stop => log_event_with_fields(
                Event::ScanComplete,
                &[
                    ("file", &file_label),
                    ("records", &records),
                    ("bytes", &consumed),
                    ("stop", stop.label()),
                ],
            ),
        }

        Ok(outcome)
    }
}
