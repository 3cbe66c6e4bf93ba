//! Schema catalog for carbon-inspect
//!
//! Record layouts are not hard-coded. They come from the data store's Thrift
//! IDL documents, parsed on first use and cached per catalog.
//!
//! - One `SchemaDefinition` per logical name, immutable after load
//! - Missing or malformed documents are fatal for the inspection
//! - Included documents are merged under qualified names

mod catalog;
mod errors;
mod lexer;
mod parser;
mod resolver;
mod types;

pub use catalog::{SchemaCatalog, IDL_EXTENSION};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use types::{
    ConstValue, EnumType, FieldDescriptor, FieldKind, RecordFlavor, RecordType, Requiredness,
    SchemaDefinition,
};
