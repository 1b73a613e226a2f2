//! Document instances and attribute access
//!
//! - Values, typed keys and mappings
//! - Documents bound to a schema tree (skeleton or seeded)
//! - Dot-notation proxies over declared fields
//! - Document types declared in code

mod doctype;
mod instance;
mod proxy;
mod value;

pub use doctype::{schema_for, SchemaDocument};
pub use instance::Document;
pub use proxy::{DotProxy, DotView, ScratchTable};
pub use value::{mapping_from_json, Key, Mapping, Value};
