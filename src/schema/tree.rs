//! Parsing raw declarations into schema trees
//!
//! Parsing rules:
//! - The root declaration must be a mapping
//! - A bare type becomes a TypeLeaf
//! - A mapping of names becomes a FixedMap (declaration order kept)
//! - A mapping with a single type key becomes a WildcardMap
//!
//! Parsing never looks at document data.

use std::collections::HashSet;

use crate::config::DocumentOptions;
use crate::observability::{log_event_with_fields, Event};

use super::declaration::{DeclKey, Declaration};
use super::errors::{DocResult, DocumentError};
use super::types::{SchemaNode, SchemaTree};

/// Builds a schema tree from a raw declaration.
///
/// # Errors
///
/// Returns a structure error if the declaration is absent, is not a
/// mapping, or is malformed anywhere below the root.
pub fn build(raw: Option<&Declaration>, options: DocumentOptions) -> DocResult<SchemaTree> {
    let raw = raw.ok_or_else(DocumentError::no_structure)?;
    if !raw.is_map() {
        return Err(DocumentError::structure_not_mapping(raw.kind_name()));
    }

    let root = parse_node(raw, "")?;
    let tree = SchemaTree::from_root(root, options);

    let namespace_count = tree.namespaces().len().to_string();
    log_event_with_fields(
        Event::StructureDeclared,
        &[("namespaces", namespace_count.as_str())],
    );

    Ok(tree)
}

/// Parses one declaration level.
fn parse_node(decl: &Declaration, path: &str) -> DocResult<SchemaNode> {
    let entries = match decl {
        Declaration::Type(t) => return Ok(SchemaNode::TypeLeaf(*t)),
        Declaration::Map(entries) => entries,
    };

    let wildcard_count = entries
        .iter()
        .filter(|(key, _)| matches!(key, DeclKey::Type(_)))
        .count();

    if wildcard_count > 0 {
        if entries.len() != 1 {
            return Err(DocumentError::malformed_structure(
                display_path(path),
                format!(
                    "a type key must be the only entry of its mapping, found [{}]",
                    Declaration::entries_described(entries).join(", ")
                ),
            ));
        }
        return parse_wildcard(&entries[0], path);
    }

    let mut seen = HashSet::with_capacity(entries.len());
    let mut children = Vec::with_capacity(entries.len());
    for (key, child) in entries {
        let DeclKey::Name(name) = key else {
            unreachable!("type keys handled above");
        };
        if !seen.insert(name.as_str()) {
            return Err(DocumentError::malformed_structure(
                display_path(path),
                format!("duplicate field '{}'", name),
            ));
        }
        let child_path = join(path, name);
        children.push((name.clone(), parse_node(child, &child_path)?));
    }

    Ok(SchemaNode::FixedMap(children))
}

fn parse_wildcard(entry: &(DeclKey, Declaration), path: &str) -> DocResult<SchemaNode> {
    let (DeclKey::Type(key_type), value_decl) = entry else {
        unreachable!("caller passes the type-keyed entry");
    };

    if !key_type.is_key_type() {
        return Err(DocumentError::malformed_structure(
            display_path(path),
            format!("type '{}' cannot be used as a mapping key", key_type),
        ));
    }

    let child_path = join(path, &format!("${}", key_type.type_name()));
    let value = parse_node(value_decl, &child_path)?;

    Ok(SchemaNode::WildcardMap {
        key_type: *key_type,
        value: Box::new(value),
    })
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "$root"
    } else {
        path
    }
}
