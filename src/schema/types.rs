//! Schema tree type definitions
//!
//! Supported leaf types:
//! - unicode: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - datetime: UTC timestamp
//! - uuid: UUID
//! - list: list of arbitrary values
//! - dict: opaque mapping (contents unchecked)
//!
//! A schema tree node is one of:
//! - TypeLeaf: terminal field holding a value of one type
//! - FixedMap: substructure with named children in declaration order
//! - WildcardMap: substructure keyed by a type rather than by names

use std::sync::Arc;

use crate::config::DocumentOptions;
use crate::document::{Key, Mapping, Value};

use super::errors::DocResult;

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// UTF-8 string
    Unicode,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// UTC timestamp
    DateTime,
    /// UUID
    Uuid,
    /// List of arbitrary values
    List,
    /// Opaque mapping
    Dict,
}

impl FieldType {
    /// Every supported field type, in declaration order.
    pub const ALL: [FieldType; 8] = [
        FieldType::Unicode,
        FieldType::Int,
        FieldType::Float,
        FieldType::Bool,
        FieldType::DateTime,
        FieldType::Uuid,
        FieldType::List,
        FieldType::Dict,
    ];

    /// Returns the type name for error messages and namespaces
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Unicode => "unicode",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::DateTime => "datetime",
            FieldType::Uuid => "uuid",
            FieldType::List => "list",
            FieldType::Dict => "dict",
        }
    }

    /// Looks a type up by its name.
    pub fn from_name(name: &str) -> Option<FieldType> {
        Self::ALL.into_iter().find(|t| t.type_name() == name)
    }

    /// Whether values of this type can be mapping keys.
    pub fn is_key_type(&self) -> bool {
        matches!(
            self,
            FieldType::Unicode | FieldType::Int | FieldType::Bool | FieldType::Uuid
        )
    }

    /// Returns true if `value` is an instance of this type.
    ///
    /// Exact match only: no coercion between numeric types.
    pub fn accepts(&self, value: &Value) -> bool {
        value.field_type() == Some(*self)
    }

    /// Returns true if `key` is an instance of this type.
    pub fn accepts_key(&self, key: &Key) -> bool {
        key.field_type() == *self
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A node of a parsed schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// Terminal field of the given type
    TypeLeaf(FieldType),
    /// Named children in declaration order
    FixedMap(Vec<(String, SchemaNode)>),
    /// Dynamic keys of `key_type`, each value conforming to `value`
    WildcardMap {
        key_type: FieldType,
        value: Box<SchemaNode>,
    },
}

/// One child edge of a container node, as seen by traversals.
#[derive(Debug, Clone, Copy)]
pub enum Segment<'a> {
    /// Literal field name
    Field(&'a str),
    /// Dynamic key constrained by type
    Wildcard(FieldType),
}

impl Segment<'_> {
    /// Renders the segment as it appears in a namespace path.
    pub fn render(&self) -> String {
        match self {
            Segment::Field(name) => (*name).to_string(),
            Segment::Wildcard(t) => format!("${}", t.type_name()),
        }
    }
}

impl SchemaNode {
    /// Returns true for `FixedMap` and `WildcardMap`.
    pub fn is_container(&self) -> bool {
        !matches!(self, SchemaNode::TypeLeaf(_))
    }

    /// Returns the child edges of a container node; empty for leaves.
    pub fn children(&self) -> Vec<(Segment<'_>, &SchemaNode)> {
        match self {
            SchemaNode::TypeLeaf(_) => Vec::new(),
            SchemaNode::FixedMap(children) => children
                .iter()
                .map(|(name, node)| (Segment::Field(name), node))
                .collect(),
            SchemaNode::WildcardMap { key_type, value } => {
                vec![(Segment::Wildcard(*key_type), value.as_ref())]
            }
        }
    }

    /// Looks up a declared field of a `FixedMap`.
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        match self {
            SchemaNode::FixedMap(children) => children
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Returns the node describing `key` at this level, if `key` is declared.
    ///
    /// For a `FixedMap` the key must name a declared child; for a
    /// `WildcardMap` it must conform to the key type.
    pub fn child_for(&self, key: &Key) -> Option<&SchemaNode> {
        match self {
            SchemaNode::TypeLeaf(_) => None,
            SchemaNode::FixedMap(_) => key.as_str().and_then(|name| self.field(name)),
            SchemaNode::WildcardMap { key_type, value } => {
                key_type.accepts_key(key).then_some(value.as_ref())
            }
        }
    }

    /// Builds the default contents for this node.
    ///
    /// Leaves are unset, fixed maps are filled recursively and wildcard
    /// maps start empty.
    pub fn skeleton(&self) -> Value {
        match self {
            SchemaNode::TypeLeaf(_) => Value::Unset,
            SchemaNode::FixedMap(_) => Value::Map(self.skeleton_mapping()),
            SchemaNode::WildcardMap { .. } => Value::map(),
        }
    }

    /// Builds the default mapping for a container node.
    pub fn skeleton_mapping(&self) -> Mapping {
        self.children()
            .into_iter()
            .filter_map(|(segment, node)| match segment {
                Segment::Field(name) => Some((Key::from(name), node.skeleton())),
                Segment::Wildcard(_) => None,
            })
            .collect()
    }
}

/// A parsed, immutable document structure.
///
/// Built once per document type and shared by every document of that type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTree {
    root: SchemaNode,
    namespaces: Vec<String>,
    options: DocumentOptions,
}

impl SchemaTree {
    /// Creates a tree from a parsed root node, deriving its namespace index.
    pub(crate) fn from_root(root: SchemaNode, options: DocumentOptions) -> Self {
        let namespaces = super::namespace::derive(&root);
        Self {
            root,
            namespaces,
            options,
        }
    }

    /// Parses a raw declaration into a shared tree.
    pub fn declare(
        raw: Option<&super::Declaration>,
        options: DocumentOptions,
    ) -> DocResult<Arc<SchemaTree>> {
        super::tree::build(raw, options).map(Arc::new)
    }

    /// Returns the root node.
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Returns the namespace index.
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Returns the options the tree was declared with.
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Whether documents of this type expose attribute access.
    pub fn use_dot_notation(&self) -> bool {
        self.options.use_dot_notation
    }

    /// Builds a skeleton mapping for this tree.
    pub fn skeleton(&self) -> Mapping {
        self.root.skeleton_mapping()
    }

    /// Validates a mapping against this tree.
    pub fn validate(&self, mapping: &Mapping) -> DocResult<()> {
        super::validator::SchemaValidator::new(self).validate_mapping(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog_node() -> SchemaNode {
        SchemaNode::FixedMap(vec![
            ("title".into(), SchemaNode::TypeLeaf(FieldType::Unicode)),
            (
                "meta".into(),
                SchemaNode::FixedMap(vec![(
                    "views".into(),
                    SchemaNode::TypeLeaf(FieldType::Int),
                )]),
            ),
            (
                "tags".into(),
                SchemaNode::WildcardMap {
                    key_type: FieldType::Unicode,
                    value: Box::new(SchemaNode::TypeLeaf(FieldType::Int)),
                },
            ),
        ])
    }

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::Unicode.type_name(), "unicode");
        assert_eq!(FieldType::Int.type_name(), "int");
        assert_eq!(FieldType::Float.type_name(), "float");
        assert_eq!(FieldType::Bool.type_name(), "bool");
        assert_eq!(FieldType::DateTime.type_name(), "datetime");
        assert_eq!(FieldType::Uuid.type_name(), "uuid");
        assert_eq!(FieldType::List.type_name(), "list");
        assert_eq!(FieldType::Dict.type_name(), "dict");
    }

    #[test]
    fn test_from_name_round_trips_every_type() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::from_name(t.type_name()), Some(t));
        }
        assert_eq!(FieldType::from_name("long"), None);
    }

    #[test]
    fn test_accepts_is_exact() {
        assert!(FieldType::Int.accepts(&Value::Int(3)));
        assert!(!FieldType::Int.accepts(&Value::from("3")));
        assert!(!FieldType::Float.accepts(&Value::Int(3)));
        assert!(!FieldType::Int.accepts(&Value::Bool(true)));
        assert!(!FieldType::Int.accepts(&Value::Unset));
    }

    #[test]
    fn test_skeleton() {
        let mapping = blog_node().skeleton_mapping();

        assert!(mapping[&Key::from("title")].is_unset());
        let meta = mapping[&Key::from("meta")].as_map().unwrap();
        assert!(meta[&Key::from("views")].is_unset());
        assert!(mapping[&Key::from("tags")].as_map().unwrap().is_empty());
    }

    #[test]
    fn test_child_for() {
        let node = blog_node();
        assert!(node.child_for(&Key::from("title")).is_some());
        assert!(node.child_for(&Key::from("nope")).is_none());

        let tags = node.field("tags").unwrap();
        assert!(tags.child_for(&Key::from("rust")).is_some());
        assert!(tags.child_for(&Key::from(4)).is_none());
    }

    #[test]
    fn test_wildcard_segment_render() {
        assert_eq!(Segment::Wildcard(FieldType::Unicode).render(), "$unicode");
        assert_eq!(Segment::Field("foo").render(), "foo");
    }
}
