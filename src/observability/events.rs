//! Observable events
//!
//! Events are explicit and typed. Each one carries the severity it is
//! logged at.

use std::fmt;

use super::logger::Severity;

/// Observable events during an inspection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Data store root resolved
    ConfigResolved,

    // Schema catalog
    /// IDL document parsed and cached
    SchemaLoaded,
    /// IDL document served from cache
    SchemaCacheHit,
    /// IDL document missing or unparsable
    SchemaLoadFailed,

    // Record scanning
    /// Record scan begins
    ScanStart,
    /// Record scan reached a clean end
    ScanComplete,
    /// Record scan stopped on undecodable trailing bytes
    ScanStoppedEarly,

    // Dispatch
    /// Table status document parsed
    PassthroughLoaded,
    /// File name matched no known kind
    FileUnrecognized,

    // Build tooling
    /// Maven process launched
    MavenInvoked,
    /// Maven process exited with failure
    MavenFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigResolved => "CONFIG_RESOLVED",

            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaCacheHit => "SCHEMA_CACHE_HIT",
            Event::SchemaLoadFailed => "SCHEMA_LOAD_FAILED",

            Event::ScanStart => "SCAN_START",
            Event::ScanComplete => "SCAN_COMPLETE",
            Event::ScanStoppedEarly => "SCAN_STOPPED_EARLY",

            Event::PassthroughLoaded => "PASSTHROUGH_LOADED",
            Event::FileUnrecognized => "FILE_UNRECOGNIZED",

            Event::MavenInvoked => "MAVEN_INVOKED",
            Event::MavenFailed => "MAVEN_FAILED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaCacheHit => Severity::Trace,
            Event::ScanStoppedEarly | Event::FileUnrecognized => Severity::Warn,
            Event::SchemaLoadFailed | Event::MavenFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
