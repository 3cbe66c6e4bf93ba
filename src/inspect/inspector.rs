//! One-file inspection: classify, then decode or pass through.

use std::fs;
use std::path::{Path, PathBuf};

use crate::observability::{log_event_with_fields, Event};
use crate::scan::RecordStreamDecoder;
use crate::schema::SchemaCatalog;
use crate::value::DecodedValue;

use super::errors::{InspectError, InspectResult};
use super::kind::{FileKind, RecordKind};

/// Result of inspecting one file
#[derive(Debug)]
pub enum Inspection {
    /// Decoded records, in file order
    Records(Vec<DecodedValue>),
    /// Table status document, as parsed
    Document(serde_json::Value),
    /// File name matched no known kind
    Unrecognized(PathBuf),
}

/// Inspects metadata files against a schema catalog.
///
/// The catalog is owned so that parsed schemas stay cached across files.
pub struct Inspector {
    catalog: SchemaCatalog,
}

impl Inspector {
    pub fn new(catalog: SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Inspects the file at `path`, choosing the handling from its name.
    pub fn inspect(&mut self, path: &Path) -> InspectResult<Inspection> {
        match FileKind::resolve_path(path) {
            FileKind::Record(kind) => self.decode_records(path, kind).map(Inspection::Records),
            FileKind::JsonPassthrough => self.load_table_status(path).map(Inspection::Document),
            FileKind::Unrecognized => {
                log_event_with_fields(
                    Event::FileUnrecognized,
                    &[("file", &path.display().to_string())],
                );
                Ok(Inspection::Unrecognized(path.to_path_buf()))
            }
        }
    }

    /// Decodes every record of `kind` in the file.
    ///
    /// The schema is resolved before the file is opened. A bad tail is not an
    /// error; whatever decoded before it is returned.
    pub fn decode_records(
        &mut self,
        path: &Path,
        kind: RecordKind,
    ) -> InspectResult<Vec<DecodedValue>> {
        let schema = self.catalog.resolve(kind.schema_name())?;
        let record_type = schema.record_type(kind.record_name())?;

        let outcome = RecordStreamDecoder::new(&schema)
            .decode_file(path, record_type)
            .map_err(|source| InspectError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(outcome.records)
    }

    /// Reads a table status file as one JSON document.
    pub fn load_table_status(&self, path: &Path) -> InspectResult<serde_json::Value> {
        let bytes = fs::read(path).map_err(|source| InspectError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let document: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|source| InspectError::Passthrough {
                path: path.to_path_buf(),
                source,
            })?;

        let bytes_len = bytes.len().to_string();
        log_event_with_fields(
            Event::PassthroughLoaded,
            &[("bytes", &bytes_len), ("file", &path.display().to_string())],
        );

        Ok(document)
    }
}
