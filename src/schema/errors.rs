//! Schema catalog error types
//!
//! Error codes:
//! - CARBON_SCHEMA_NOT_FOUND
//! - CARBON_SCHEMA_MALFORMED
//! - CARBON_SCHEMA_UNKNOWN_RECORD
//!
//! Every schema error is fatal for the inspection that triggered it.
//! Nothing is retried and no partial output is produced.

use std::fmt;
use std::io;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// IDL document could not be located or read
    CarbonSchemaNotFound,
    /// IDL document could not be parsed or resolved
    CarbonSchemaMalformed,
    /// Record type not declared in the document
    CarbonSchemaUnknownRecord,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::CarbonSchemaNotFound => "CARBON_SCHEMA_NOT_FOUND",
            SchemaErrorCode::CarbonSchemaMalformed => "CARBON_SCHEMA_MALFORMED",
            SchemaErrorCode::CarbonSchemaUnknownRecord => "CARBON_SCHEMA_UNKNOWN_RECORD",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    /// Logical schema name the error relates to
    schema: String,
    message: String,
    /// Location detail (file path, line)
    details: Option<String>,
    source: Option<io::Error>,
}

impl SchemaError {
    /// IDL document missing or unreadable
    pub fn not_found(schema: impl Into<String>, path: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: SchemaErrorCode::CarbonSchemaNotFound,
            schema: schema.into(),
            message: "Schema definition could not be read".into(),
            details: Some(format!("path: {}", path.into())),
            source: Some(source),
        }
    }

    /// IDL document failed to parse or resolve
    pub fn malformed(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::CarbonSchemaMalformed,
            schema: schema.into(),
            message: reason.into(),
            details: None,
            source: None,
        }
    }

    /// Parse failure at a given line
    pub fn malformed_at_line(schema: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::CarbonSchemaMalformed,
            schema: schema.into(),
            message: reason.into(),
            details: Some(format!("line: {}", line)),
            source: None,
        }
    }

    /// Record type not present in the definition
    pub fn unknown_record(schema: impl Into<String>, record: &str) -> Self {
        Self {
            code: SchemaErrorCode::CarbonSchemaUnknownRecord,
            schema: schema.into(),
            message: format!("Unknown record type: {}", record),
            details: None,
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the logical schema name
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.code.code(), self.schema, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
