//! docshape - declared structures for schema-less documents
//!
//! Declare the shape of a document once, then build, mutate and validate
//! instances of it before they reach a store.

pub mod config;
pub mod document;
pub mod observability;
pub mod schema;
pub mod store;

pub use config::DocumentOptions;
pub use document::{Document, Key, Mapping, SchemaDocument, Value};
pub use schema::{Declaration, DocResult, DocumentError, FieldType, SchemaTree};
pub use store::DocumentStore;
