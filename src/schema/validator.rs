//! Document validation against a schema tree
//!
//! Validation semantics:
//! - Every declared field is present (unset leaves count as present)
//! - No undeclared fields exist
//! - Leaf values match their declared type exactly, unless unset
//! - Substructures hold mappings
//! - Wildcard keys match the declared key type
//!
//! Validation stops at the first violation. Order is deterministic:
//! declared children in declaration order, then undeclared keys in key
//! order; wildcard entries in key order.

use crate::document::{Key, Mapping, Value};

use super::errors::{DocResult, DocumentError};
use super::types::{SchemaNode, SchemaTree};

/// Validator over one schema tree.
///
/// Validation does not mutate documents.
pub struct SchemaValidator<'a> {
    tree: &'a SchemaTree,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator for the given tree.
    pub fn new(tree: &'a SchemaTree) -> Self {
        Self { tree }
    }

    /// Validates the top-level mapping of a document.
    ///
    /// # Errors
    ///
    /// Returns a structure error for missing or unexpected fields and a
    /// schema type error for values or keys of the wrong type.
    pub fn validate_mapping(&self, mapping: &Mapping) -> DocResult<()> {
        self.validate_container(self.tree.root(), mapping, "")
    }

    /// Validates a mapping against a container node.
    fn validate_container(
        &self,
        node: &SchemaNode,
        mapping: &Mapping,
        path: &str,
    ) -> DocResult<()> {
        match node {
            SchemaNode::TypeLeaf(_) => Ok(()),
            SchemaNode::FixedMap(children) => {
                for (name, child) in children {
                    let field_path = make_path(path, name);
                    match mapping.get(&Key::from(name)) {
                        Some(value) => self.validate_value(child, value, &field_path)?,
                        None => return Err(DocumentError::missing_field(field_path)),
                    }
                }

                // Check for undeclared fields
                for key in mapping.keys() {
                    if node.child_for(key).is_none() {
                        let field_path = make_path(path, &key.to_string());
                        return Err(DocumentError::unexpected_field(field_path));
                    }
                }

                Ok(())
            }
            SchemaNode::WildcardMap { key_type, value } => {
                for (key, item) in mapping {
                    let entry_path = make_path(path, &key.to_string());
                    if !key_type.accepts_key(key) {
                        return Err(DocumentError::type_mismatch(
                            entry_path,
                            format!("key of type {}", key_type),
                            format!("key of type {}", key.field_type()),
                        ));
                    }
                    self.validate_value(value, item, &entry_path)?;
                }
                Ok(())
            }
        }
    }

    /// Validates a present value against a node.
    fn validate_value(&self, node: &SchemaNode, value: &Value, path: &str) -> DocResult<()> {
        match node {
            SchemaNode::TypeLeaf(expected) => {
                if value.is_unset() || expected.accepts(value) {
                    Ok(())
                } else {
                    Err(DocumentError::type_mismatch(path, expected.type_name(), value.type_name()))
                }
            }
            SchemaNode::FixedMap(_) | SchemaNode::WildcardMap { .. } => {
                let mapping = value
                    .as_map()
                    .ok_or_else(|| DocumentError::type_mismatch(path, "dict", value.type_name()))?;
                self.validate_container(node, mapping, path)
            }
        }
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
