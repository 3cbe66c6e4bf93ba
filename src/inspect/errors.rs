//! Inspection errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaError;

/// Failures that abort an inspection with no partial output
#[derive(Debug, Error)]
pub enum InspectError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("table status {} is not valid JSON: {source}", .path.display())]
    Passthrough {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type InspectResult<T> = Result<T, InspectError>;
