//! carbon-inspect - Decode CarbonData metadata files to JSON
//!
//! Metadata files are streams of Thrift binary-protocol records whose types
//! are defined in the `.thrift` IDL shipped with the source tree. Schemas are
//! parsed at runtime; no generated code is involved.

pub mod cli;
pub mod inspect;
pub mod observability;
pub mod scan;
pub mod schema;
pub mod value;
pub mod wire;
