//! Stream-level decoding: many records per file, best-effort.

mod decoder;

pub use decoder::{RecordStreamDecoder, ScanOutcome, StopReason};
