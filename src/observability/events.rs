//! Observable lifecycle events
//!
//! Events are explicit and typed. Validation outcomes are returned to the
//! caller and are never events.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A raw structure was parsed into a schema tree
    StructureDeclared,
    /// A schema tree was cached for a Rust document type
    DocumentTypeCached,
    /// Declaration files were loaded into a registry
    RegistryLoaded,
    /// A validated snapshot was handed to a store
    DocumentSaved,
    /// A mapping was loaded from a store and wrapped
    DocumentLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StructureDeclared => "STRUCTURE_DECLARED",
            Event::DocumentTypeCached => "DOCUMENT_TYPE_CACHED",
            Event::RegistryLoaded => "REGISTRY_LOADED",
            Event::DocumentSaved => "DOCUMENT_SAVED",
            Event::DocumentLoaded => "DOCUMENT_LOADED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RegistryLoaded => Severity::Info,
            _ => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
