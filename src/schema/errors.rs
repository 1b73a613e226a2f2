//! Error types for declaration, validation and attribute access
//!
//! Error codes:
//! - STRUCTURE_ERROR: declaration malformed, field missing or unexpected
//! - SCHEMA_TYPE_ERROR: value or wildcard key of the wrong type
//! - ATTRIBUTE_ERROR: dot-notation access failed
//! - STORE_ERROR: the document store rejected a save or load

use std::fmt;

use thiserror::Error;

/// Error kinds, each with a stable code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Declaration or document shape problem
    Structure,
    /// Value does not conform to its declared type
    SchemaType,
    /// Attribute not found or not reachable
    Attribute,
    /// Store collaborator failure
    Store,
}

impl ErrorKind {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Structure => "STRUCTURE_ERROR",
            ErrorKind::SchemaType => "SCHEMA_TYPE_ERROR",
            ErrorKind::Attribute => "ATTRIBUTE_ERROR",
            ErrorKind::Store => "STORE_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Location and expectation of a document violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    /// Field path (e.g., "meta.views")
    pub path: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value type or condition found
    pub actual: String,
}

impl ErrorDetails {
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::new(path, "field to be present", "missing")
    }

    pub fn unexpected_field(path: impl Into<String>) -> Self {
        Self::new(path, "no undeclared fields", "unexpected field present")
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(path, expected, actual)
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.path, self.expected, self.actual)
    }
}

/// Error raised by declaration, validation, attribute access or store handoff
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct DocumentError {
    kind: ErrorKind,
    message: String,
    details: Option<ErrorDetails>,
}

impl DocumentError {
    /// Declared structure is absent
    pub fn no_structure() -> Self {
        Self {
            kind: ErrorKind::Structure,
            message: "no structure declared".into(),
            details: None,
        }
    }

    /// Declared structure is not a mapping
    pub fn structure_not_mapping(found: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Structure,
            message: format!("structure must be a mapping, got {}", found.into()),
            details: None,
        }
    }

    /// Declared structure is malformed at `path`
    pub fn malformed_structure(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let path = path.into();
        let reason = reason.into();
        Self {
            kind: ErrorKind::Structure,
            message: format!("malformed structure at '{}': {}", path, reason),
            details: Some(ErrorDetails::new(path, "well-formed declaration", reason)),
        }
    }

    /// Declaration file could not be read or decoded
    pub fn declaration_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Structure,
            message: format!("bad declaration file '{}': {}", path.into(), reason.into()),
            details: None,
        }
    }

    /// Document type name is already declared
    pub fn already_declared(name: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Structure,
            message: format!("document type '{}' is already declared", name.into()),
            details: None,
        }
    }

    /// Document type name is not declared
    pub fn unknown_structure(name: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Structure,
            message: format!("document type '{}' is not declared", name.into()),
            details: None,
        }
    }

    /// Document is missing a declared field
    pub fn missing_field(path: impl Into<String>) -> Self {
        let details = ErrorDetails::missing_field(path);
        Self {
            kind: ErrorKind::Structure,
            message: format!("missing field: {}", details),
            details: Some(details),
        }
    }

    /// Document carries a field its structure does not declare
    pub fn unexpected_field(path: impl Into<String>) -> Self {
        let details = ErrorDetails::unexpected_field(path);
        Self {
            kind: ErrorKind::Structure,
            message: format!("unexpected field: {}", details),
            details: Some(details),
        }
    }

    /// Value or key at `path` has the wrong type
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let details = ErrorDetails::type_mismatch(path, expected, actual);
        Self {
            kind: ErrorKind::SchemaType,
            message: format!("type mismatch: {}", details),
            details: Some(details),
        }
    }

    /// Attribute was never set and is not declared
    pub fn attribute_not_found(name: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Attribute,
            message: format!("no attribute '{}'", name.into()),
            details: None,
        }
    }

    /// Attribute access on a document type without dot notation
    pub fn dot_notation_disabled() -> Self {
        Self {
            kind: ErrorKind::Attribute,
            message: "dot notation is not enabled for this document type".into(),
            details: None,
        }
    }

    /// Attribute exists but does not hold a navigable substructure
    pub fn not_navigable(path: impl Into<String>, actual: impl Into<String>) -> Self {
        let details = ErrorDetails::new(path, "substructure", actual);
        Self {
            kind: ErrorKind::Attribute,
            message: format!("cannot descend: {}", details),
            details: Some(details),
        }
    }

    /// Store collaborator failure
    pub fn store(reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Store,
            message: reason.into(),
            details: None,
        }
    }

    /// Returns the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns violation details if applicable
    pub fn details(&self) -> Option<&ErrorDetails> {
        self.details.as_ref()
    }

    pub fn is_structure_error(&self) -> bool {
        self.kind == ErrorKind::Structure
    }

    pub fn is_schema_type_error(&self) -> bool {
        self.kind == ErrorKind::SchemaType
    }

    pub fn is_attribute_error(&self) -> bool {
        self.kind == ErrorKind::Attribute
    }
}

/// Result type for document operations
pub type DocResult<T> = Result<T, DocumentError>;
