//! Observability for carbon-inspect
//!
//! Structured JSON log lines on stderr. Observability is read-only and
//! never changes the outcome of an inspection.
//!
//! ```ignore
//! use carbon_inspect::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ScanStart, &[("file", "0.dict")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{min_severity, Logger, Severity, LOG_LEVEL_ENV};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
