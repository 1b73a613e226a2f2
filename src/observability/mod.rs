//! Observability for docshape
//!
//! Structured JSON-lines logging of lifecycle events:
//! - Observability is read-only and never changes results
//! - Synchronous, no background threads
//! - Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use docshape::config::LoggingConfig;
//! use docshape::observability::{log_event, Event};
//!
//! LoggingConfig::verbose().apply();
//! log_event(Event::StructureDeclared);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
