//! File inspection
//!
//! Maps a metadata file to its handling and produces either decoded value
//! trees or the table status document.

mod errors;
mod inspector;
mod kind;

pub use errors::{InspectError, InspectResult};
pub use inspector::{Inspection, Inspector};
pub use kind::{FileKind, RecordKind};
