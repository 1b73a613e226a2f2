//! Schema subsystem
//!
//! Declared structures are parsed once into immutable schema trees, which
//! drive skeleton generation, namespace derivation and validation.
//!
//! # Design Principles
//!
//! - Declarations are checked when parsed, never at validation time
//! - Trees are immutable and shared between documents
//! - Validation is deterministic and stops at the first violation
//! - Unset leaves are exempt from type checks, never from presence checks

mod declaration;
mod errors;
mod namespace;
mod registry;
mod tree;
mod types;
mod validator;

pub use declaration::{DeclKey, Declaration};
pub use errors::{DocResult, DocumentError, ErrorDetails, ErrorKind};
pub use namespace::derive as derive_namespaces;
pub use registry::StructureRegistry;
pub use types::{FieldType, SchemaNode, SchemaTree, Segment};
pub use validator::SchemaValidator;
