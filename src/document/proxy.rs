//! Dot-notation proxies
//!
//! A proxy fronts one mapping level of a document together with the schema
//! node describing it. Names declared by the node read and write the
//! mapping itself. Any other name goes to the document's scratch table,
//! which is never persisted, validated or compared.
//!
//! Proxies hold no data of their own. They are rebuilt on demand from
//! (mapping, node, level), where the level is the list of field names
//! leading to the mapping. Scratch attributes are keyed by that list, so a
//! rebuilt proxy sees the same ones. Replacing or deleting a declared field
//! through a proxy drops the scratch attributes of every level below it.

use std::collections::{BTreeMap, HashMap};

use crate::schema::{DocResult, DocumentError, SchemaNode};

use super::value::{Key, Mapping, Value};

/// Undeclared attributes, per mapping level.
#[derive(Debug, Clone, Default)]
pub struct ScratchTable {
    levels: HashMap<Vec<String>, BTreeMap<String, Value>>,
}

impl ScratchTable {
    fn get(&self, level: &[String], name: &str) -> Option<&Value> {
        self.levels.get(level).and_then(|attrs| attrs.get(name))
    }

    fn set(&mut self, level: &[String], name: &str, value: Value) {
        self.levels
            .entry(level.to_vec())
            .or_default()
            .insert(name.to_string(), value);
    }

    fn remove(&mut self, level: &[String], name: &str) -> Option<Value> {
        let attrs = self.levels.get_mut(level)?;
        let value = attrs.remove(name);
        if attrs.is_empty() {
            self.levels.remove(level);
        }
        value
    }

    /// Drops the attributes of `prefix` and of every level below it.
    pub(crate) fn clear_below(&mut self, prefix: &[String]) {
        self.levels.retain(|level, _| !level.starts_with(prefix));
    }

    /// Number of scratch attributes across all levels.
    pub fn len(&self) -> usize {
        self.levels.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Returns the node that declares `name` at a level described by `node`.
///
/// Fixed maps declare their children; a wildcard keyed by unicode declares
/// every name.
fn declared<'n>(node: &'n SchemaNode, name: &str) -> Option<&'n SchemaNode> {
    node.child_for(&Key::from(name))
}

fn child_level(level: &[String], name: &str) -> Vec<String> {
    let mut child = level.to_vec();
    child.push(name.to_string());
    child
}

/// Dotted rendering of `name` under `level`, for error messages.
fn dotted(level: &[String], name: &str) -> String {
    child_level(level, name).join(".")
}

fn read<'a>(
    mapping: &'a Mapping,
    node: &SchemaNode,
    scratch: &'a ScratchTable,
    level: &[String],
    name: &str,
) -> DocResult<&'a Value> {
    let found = match declared(node, name) {
        Some(_) => mapping.get(&Key::from(name)),
        None => scratch.get(level, name),
    };
    found.ok_or_else(|| DocumentError::attribute_not_found(dotted(level, name)))
}

/// Checks that `name` leads to a substructure and returns its node.
fn descend<'n>(
    node: &'n SchemaNode,
    level: &[String],
    name: &str,
    value: Option<&Value>,
) -> DocResult<&'n SchemaNode> {
    let child = declared(node, name).ok_or_else(|| {
        DocumentError::not_navigable(dotted(level, name), "undeclared attribute")
    })?;
    let value = value.ok_or_else(|| DocumentError::attribute_not_found(dotted(level, name)))?;
    if !child.is_container() || !value.is_map() {
        return Err(DocumentError::not_navigable(dotted(level, name), value.type_name()));
    }
    Ok(child)
}

/// Read-only attribute view over one mapping level.
#[derive(Debug, Clone)]
pub struct DotView<'a> {
    mapping: &'a Mapping,
    node: &'a SchemaNode,
    level: Vec<String>,
    scratch: &'a ScratchTable,
}

impl<'a> DotView<'a> {
    pub(crate) fn new(
        mapping: &'a Mapping,
        node: &'a SchemaNode,
        level: Vec<String>,
        scratch: &'a ScratchTable,
    ) -> Self {
        Self {
            mapping,
            node,
            level,
            scratch,
        }
    }

    /// Field names leading to this level; empty at the top.
    pub fn level(&self) -> &[String] {
        &self.level
    }

    /// Dotted path of this level; empty at the top.
    pub fn path(&self) -> String {
        self.level.join(".")
    }

    /// Whether `name` is declared at this level.
    pub fn is_declared(&self, name: &str) -> bool {
        declared(self.node, name).is_some()
    }

    /// Reads an attribute.
    pub fn get(&self, name: &str) -> DocResult<&'a Value> {
        read(self.mapping, self.node, self.scratch, &self.level, name)
    }

    /// Returns a view over the substructure `name`.
    pub fn at(&self, name: &str) -> DocResult<DotView<'a>> {
        let value = self.mapping.get(&Key::from(name));
        let child = descend(self.node, &self.level, name, value)?;
        let mapping = value
            .and_then(Value::as_map)
            .ok_or_else(|| DocumentError::attribute_not_found(dotted(&self.level, name)))?;
        Ok(DotView::new(mapping, child, child_level(&self.level, name), self.scratch))
    }
}

/// Mutable attribute proxy over one mapping level.
#[derive(Debug)]
pub struct DotProxy<'a> {
    mapping: &'a mut Mapping,
    node: &'a SchemaNode,
    level: Vec<String>,
    scratch: &'a mut ScratchTable,
}

impl<'a> DotProxy<'a> {
    pub(crate) fn new(
        mapping: &'a mut Mapping,
        node: &'a SchemaNode,
        level: Vec<String>,
        scratch: &'a mut ScratchTable,
    ) -> Self {
        Self {
            mapping,
            node,
            level,
            scratch,
        }
    }

    /// Field names leading to this level; empty at the top.
    pub fn level(&self) -> &[String] {
        &self.level
    }

    /// Dotted path of this level; empty at the top.
    pub fn path(&self) -> String {
        self.level.join(".")
    }

    /// Whether `name` is declared at this level.
    pub fn is_declared(&self, name: &str) -> bool {
        declared(self.node, name).is_some()
    }

    /// Reads an attribute.
    ///
    /// # Errors
    ///
    /// Attribute error if `name` is declared but absent from the mapping,
    /// or undeclared and never set.
    pub fn get(&self, name: &str) -> DocResult<&Value> {
        read(&*self.mapping, self.node, &*self.scratch, &self.level, name)
    }

    /// Writes an attribute.
    ///
    /// Writing a declared field replaces whatever it held, so scratch
    /// attributes attached below it are dropped.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        if declared(self.node, name).is_some() {
            self.scratch.clear_below(&child_level(&self.level, name));
            self.mapping.insert(Key::from(name), value);
        } else {
            self.scratch.set(&self.level, name, value);
        }
    }

    /// Deletes an attribute, returning its value.
    pub fn delete(&mut self, name: &str) -> DocResult<Value> {
        let removed = if declared(self.node, name).is_some() {
            self.scratch.clear_below(&child_level(&self.level, name));
            self.mapping.remove(&Key::from(name))
        } else {
            self.scratch.remove(&self.level, name)
        };
        removed.ok_or_else(|| DocumentError::attribute_not_found(dotted(&self.level, name)))
    }

    /// Returns a proxy over the substructure `name`.
    pub fn at(&mut self, name: &str) -> DocResult<DotProxy<'_>> {
        let child = descend(self.node, &self.level, name, self.mapping.get(&Key::from(name)))?;
        let level = child_level(&self.level, name);
        let mapping = self
            .mapping
            .get_mut(&Key::from(name))
            .and_then(Value::as_map_mut)
            .ok_or_else(|| DocumentError::attribute_not_found(level.join(".")))?;
        Ok(DotProxy::new(mapping, child, level, &mut *self.scratch))
    }

    /// Consumes the proxy, returning one over the substructure `name`.
    pub fn into_at(self, name: &str) -> DocResult<DotProxy<'a>> {
        let DotProxy {
            mapping,
            node,
            level: parent,
            scratch,
        } = self;
        let child = descend(node, &parent, name, mapping.get(&Key::from(name)))?;
        let level = child_level(&parent, name);
        let mapping = mapping
            .get_mut(&Key::from(name))
            .and_then(Value::as_map_mut)
            .ok_or_else(|| DocumentError::attribute_not_found(level.join(".")))?;
        Ok(DotProxy::new(mapping, child, level, scratch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn node() -> SchemaNode {
        SchemaNode::FixedMap(vec![
            ("spam".into(), SchemaNode::TypeLeaf(FieldType::Int)),
            (
                "foo".into(),
                SchemaNode::FixedMap(vec![(
                    "bar".into(),
                    SchemaNode::TypeLeaf(FieldType::Unicode),
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
    fn test_declared_and_scratch_routing() {
        let node = node();
        let mut mapping = node.skeleton_mapping();
        let mut scratch = ScratchTable::default();

        let mut proxy = DotProxy::new(&mut mapping, &node, Vec::new(), &mut scratch);
        proxy.set("spam", 4);
        proxy.set("eggs", 5);

        assert_eq!(proxy.get("spam").unwrap(), &Value::Int(4));
        assert_eq!(proxy.get("eggs").unwrap(), &Value::Int(5));
        assert!(proxy.get("missing").unwrap_err().is_attribute_error());

        assert_eq!(mapping[&Key::from("spam")], Value::Int(4));
        assert!(!mapping.contains_key(&Key::from("eggs")));
        assert_eq!(scratch.len(), 1);
    }

    #[test]
    fn test_nested_scratch_is_per_level() {
        let node = node();
        let mut mapping = node.skeleton_mapping();
        let mut scratch = ScratchTable::default();

        {
            let mut proxy = DotProxy::new(&mut mapping, &node, Vec::new(), &mut scratch);
            let mut foo = proxy.at("foo").unwrap();
            assert_eq!(foo.path(), "foo");
            foo.set("eggs", 1);
            foo.set("bar", "x");
        }

        assert_eq!(scratch.get(&["foo".to_string()], "eggs"), Some(&Value::Int(1)));
        assert!(scratch.get(&[], "eggs").is_none());

        let view = DotView::new(&mapping, &node, Vec::new(), &scratch);
        assert!(view.get("eggs").is_err());
        assert_eq!(view.at("foo").unwrap().get("eggs").unwrap(), &Value::Int(1));
        assert_eq!(view.at("foo").unwrap().get("bar").unwrap(), &Value::from("x"));
    }

    #[test]
    fn test_delete() {
        let node = node();
        let mut mapping = node.skeleton_mapping();
        let mut scratch = ScratchTable::default();
        let mut proxy = DotProxy::new(&mut mapping, &node, Vec::new(), &mut scratch);

        proxy.set("eggs", 1);
        assert_eq!(proxy.delete("eggs").unwrap(), Value::Int(1));
        assert!(proxy.delete("eggs").unwrap_err().is_attribute_error());

        assert!(proxy.delete("spam").unwrap().is_unset());
        assert!(proxy.get("spam").unwrap_err().is_attribute_error());
        assert!(scratch.is_empty());
    }

    #[test]
    fn test_unicode_wildcard_declares_every_name() {
        let node = node();
        let mut mapping = node.skeleton_mapping();
        let mut scratch = ScratchTable::default();
        let mut proxy = DotProxy::new(&mut mapping, &node, Vec::new(), &mut scratch);

        let mut tags = proxy.at("tags").unwrap();
        assert!(tags.is_declared("anything"));
        tags.set("rust", 3);

        let tags = mapping[&Key::from("tags")].as_map().unwrap();
        assert_eq!(tags[&Key::from("rust")], Value::Int(3));
        assert!(scratch.is_empty());
    }

    #[test]
    fn test_dotted_field_name_is_its_own_level() {
        let node = SchemaNode::FixedMap(vec![
            (
                "a".into(),
                SchemaNode::FixedMap(vec![(
                    "b".into(),
                    SchemaNode::FixedMap(vec![("c".into(), SchemaNode::TypeLeaf(FieldType::Int))]),
                )]),
            ),
            (
                "a.b".into(),
                SchemaNode::FixedMap(vec![("c".into(), SchemaNode::TypeLeaf(FieldType::Int))]),
            ),
        ]);
        let mut mapping = node.skeleton_mapping();
        let mut scratch = ScratchTable::default();

        let proxy = DotProxy::new(&mut mapping, &node, Vec::new(), &mut scratch);
        let mut nested = proxy.into_at("a").unwrap().into_at("b").unwrap();
        assert_eq!(nested.path(), "a.b");
        nested.set("note", "nested");

        let mut proxy = DotProxy::new(&mut mapping, &node, Vec::new(), &mut scratch);
        let sibling = proxy.at("a.b").unwrap();
        assert_eq!(sibling.level(), ["a.b"]);
        assert!(sibling.get("note").unwrap_err().is_attribute_error());
    }

    #[test]
    fn test_replacing_substructure_drops_its_scratch() {
        let node = node();
        let mut mapping = node.skeleton_mapping();
        let mut scratch = ScratchTable::default();
        let mut proxy = DotProxy::new(&mut mapping, &node, Vec::new(), &mut scratch);

        proxy.set("eggs", 1);
        proxy.at("foo").unwrap().set("eggs", 4);
        proxy.delete("foo").unwrap();
        proxy.set("foo", Value::from(serde_json::json!({ "bar": "new" })));
        assert!(proxy.at("foo").unwrap().get("eggs").unwrap_err().is_attribute_error());

        proxy.at("foo").unwrap().set("eggs", 5);
        proxy.set("foo", Value::from(serde_json::json!({ "bar": "newer" })));
        assert!(proxy.at("foo").unwrap().get("eggs").unwrap_err().is_attribute_error());

        // Siblings and the parent level keep theirs
        assert_eq!(proxy.get("eggs").unwrap(), &Value::Int(1));
        assert_eq!(scratch.len(), 1);
    }

    #[test]
    fn test_cannot_descend_into_leaf_or_scratch() {
        let node = node();
        let mut mapping = node.skeleton_mapping();
        let mut scratch = ScratchTable::default();
        let mut proxy = DotProxy::new(&mut mapping, &node, Vec::new(), &mut scratch);

        assert!(proxy.at("spam").unwrap_err().is_attribute_error());
        proxy.set("eggs", Value::map());
        assert!(proxy.at("eggs").unwrap_err().is_attribute_error());
    }
}
