//! Raw structure declarations
//!
//! A declaration is what a document type writes down before any parsing:
//! a mapping whose entries are either a type (a leaf), a nested mapping
//! (a substructure), or keyed by a type instead of a name (a wildcard).
//!
//! Declarations are built in code or read from JSON:
//!
//! ```json
//! { "title": "unicode", "meta": { "views": "int" }, "tags": { "$unicode": "int" } }
//! ```

use serde_json::Value as JsonValue;

use super::errors::{DocResult, DocumentError};
use super::types::FieldType;

/// Key of a declaration entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKey {
    /// Literal field name
    Name(String),
    /// Type of dynamic keys
    Type(FieldType),
}

impl DeclKey {
    fn describe(&self) -> String {
        match self {
            DeclKey::Name(name) => name.clone(),
            DeclKey::Type(t) => format!("${}", t.type_name()),
        }
    }
}

/// A raw, unparsed structure declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A bare type
    Type(FieldType),
    /// A mapping of entries, in declaration order
    Map(Vec<(DeclKey, Declaration)>),
}

impl Declaration {
    /// An empty mapping declaration.
    pub fn map() -> Self {
        Declaration::Map(Vec::new())
    }

    /// Adds a named entry. Has no effect on a `Type` declaration.
    pub fn field(mut self, name: impl Into<String>, decl: impl Into<Declaration>) -> Self {
        if let Declaration::Map(entries) = &mut self {
            entries.push((DeclKey::Name(name.into()), decl.into()));
        }
        self
    }

    /// Adds an entry keyed by type. Has no effect on a `Type` declaration.
    pub fn wildcard(mut self, key_type: FieldType, decl: impl Into<Declaration>) -> Self {
        if let Declaration::Map(entries) = &mut self {
            entries.push((DeclKey::Type(key_type), decl.into()));
        }
        self
    }

    /// Returns true for mapping declarations.
    pub fn is_map(&self) -> bool {
        matches!(self, Declaration::Map(_))
    }

    /// Human-readable kind, for error messages.
    pub fn kind_name(&self) -> String {
        match self {
            Declaration::Type(t) => format!("type '{}'", t.type_name()),
            Declaration::Map(_) => "mapping".into(),
        }
    }

    /// Reads a declaration from JSON.
    ///
    /// Strings name leaf types, objects are mappings and object keys of the
    /// form `$<type>` are wildcard keys. Any other JSON value is a
    /// structure error.
    pub fn from_json(json: &JsonValue) -> DocResult<Declaration> {
        parse_json(json, "")
    }

    pub(crate) fn entries_described(entries: &[(DeclKey, Declaration)]) -> Vec<String> {
        entries.iter().map(|(k, _)| k.describe()).collect()
    }
}

impl From<FieldType> for Declaration {
    fn from(t: FieldType) -> Self {
        Declaration::Type(t)
    }
}

fn parse_json(json: &JsonValue, path: &str) -> DocResult<Declaration> {
    match json {
        JsonValue::String(name) => FieldType::from_name(name)
            .map(Declaration::Type)
            .ok_or_else(|| {
                DocumentError::malformed_structure(
                    display_path(path),
                    format!("unknown type '{}'", name),
                )
            }),
        JsonValue::Object(obj) => {
            let mut entries = Vec::with_capacity(obj.len());
            for (key, value) in obj {
                let decl_key = match key.strip_prefix('$') {
                    Some(type_name) => DeclKey::Type(FieldType::from_name(type_name).ok_or_else(|| {
                        DocumentError::malformed_structure(
                            display_path(path),
                            format!("unknown key type '{}'", key),
                        )
                    })?),
                    None => DeclKey::Name(key.clone()),
                };
                let child_path = join(path, key);
                entries.push((decl_key, parse_json(value, &child_path)?));
            }
            Ok(Declaration::Map(entries))
        }
        other if path.is_empty() => Err(DocumentError::structure_not_mapping(json_kind(other))),
        other => Err(DocumentError::malformed_structure(
            path,
            format!("expected a type name or a mapping, got {}", json_kind(other)),
        )),
    }
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
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
