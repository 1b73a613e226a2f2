//! Document instances
//!
//! A document is a mapping bound to the schema tree of its type. It is
//! created either as a skeleton (every declared leaf unset) or seeded with
//! caller data, which is taken as-is. Nothing is checked until
//! `validate()` is called.

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::schema::{DocResult, DocumentError, SchemaTree};

use super::proxy::{DotProxy, DotView, ScratchTable};
use super::value::{Key, Mapping, Value};

static UNSET: Value = Value::Unset;

/// A document bound to a schema tree.
///
/// Equality compares field contents only: the bound tree and any
/// attributes stored through dot notation are ignored.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Arc<SchemaTree>,
    data: Mapping,
    dot_notation: bool,
    scratch: ScratchTable,
}

impl Document {
    /// Creates a document; `None` builds a skeleton, `Some` seeds it.
    pub fn new(tree: Arc<SchemaTree>, data: Option<Mapping>) -> Self {
        match data {
            Some(data) => Self::seeded(tree, data),
            None => Self::skeleton(tree),
        }
    }

    /// Creates a document with default contents.
    pub fn skeleton(tree: Arc<SchemaTree>) -> Self {
        let data = tree.skeleton();
        Self::seeded(tree, data)
    }

    /// Creates a document holding exactly `data`.
    pub fn seeded(tree: Arc<SchemaTree>, data: Mapping) -> Self {
        let dot_notation = tree.use_dot_notation();
        Self {
            tree,
            data,
            dot_notation,
            scratch: ScratchTable::default(),
        }
    }

    /// Returns the bound schema tree.
    pub fn tree(&self) -> &Arc<SchemaTree> {
        &self.tree
    }

    /// Returns the namespace index of the bound tree.
    pub fn namespaces(&self) -> &[String] {
        self.tree.namespaces()
    }

    /// Whether attribute access is enabled.
    pub fn use_dot_notation(&self) -> bool {
        self.dot_notation
    }

    /// Validates the current contents against the bound tree.
    ///
    /// # Errors
    ///
    /// Returns the first structure or schema type violation found.
    pub fn validate(&self) -> DocResult<()> {
        self.tree.validate(&self.data)
    }

    // ---- mapping access -------------------------------------------------

    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.data.get(&key.into())
    }

    pub fn get_mut(&mut self, key: impl Into<Key>) -> Option<&mut Value> {
        self.data.get_mut(&key.into())
    }

    /// Follows `path` through nested mappings.
    pub fn get_path(&self, path: &[Key]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.data.get(first)?, |value, key| value.as_map()?.get(key))
    }

    /// Sets a field, returning the previous value.
    ///
    /// Scratch attributes attached below the field are dropped with the
    /// value it replaces.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        self.forget_scratch_below(&key);
        self.data.insert(key, value.into())
    }

    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Value> {
        let key = key.into();
        self.forget_scratch_below(&key);
        self.data.remove(&key)
    }

    fn forget_scratch_below(&mut self, key: &Key) {
        if let Some(name) = key.as_str() {
            self.scratch.clear_below(&[name.to_string()]);
        }
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.data.contains_key(&key.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.data.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.data.keys()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrows the persisted contents.
    pub fn as_mapping(&self) -> &Mapping {
        &self.data
    }

    /// Returns a plain copy of the persisted contents.
    pub fn snapshot(&self) -> Mapping {
        self.data.clone()
    }

    pub fn into_mapping(self) -> Mapping {
        self.data
    }

    // ---- attribute access -----------------------------------------------

    /// Returns a read-only attribute view of the top level.
    pub fn view(&self) -> DocResult<DotView<'_>> {
        self.ensure_dot_notation()?;
        Ok(DotView::new(&self.data, self.tree.root(), Vec::new(), &self.scratch))
    }

    /// Returns a mutable attribute proxy over the top level.
    pub fn attrs(&mut self) -> DocResult<DotProxy<'_>> {
        self.ensure_dot_notation()?;
        let Self { tree, data, scratch, .. } = self;
        Ok(DotProxy::new(data, tree.root(), Vec::new(), scratch))
    }

    /// Returns a mutable attribute proxy over the substructure `name`.
    pub fn attr(&mut self, name: &str) -> DocResult<DotProxy<'_>> {
        self.attrs()?.into_at(name)
    }

    /// Reads an attribute: a declared field or a stored scratch attribute.
    pub fn get_attr(&self, name: &str) -> DocResult<&Value> {
        self.view()?.get(name)
    }

    /// Writes an attribute. Declared names land in the mapping, others in
    /// the scratch table.
    pub fn set_attr(&mut self, name: &str, value: impl Into<Value>) -> DocResult<()> {
        self.attrs()?.set(name, value);
        Ok(())
    }

    /// Deletes an attribute, returning its value.
    pub fn del_attr(&mut self, name: &str) -> DocResult<Value> {
        self.attrs()?.delete(name)
    }

    fn ensure_dot_notation(&self) -> DocResult<()> {
        if self.dot_notation {
            Ok(())
        } else {
            Err(DocumentError::dot_notation_disabled())
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl PartialEq<Mapping> for Document {
    fn eq(&self, other: &Mapping) -> bool {
        &self.data == other
    }
}

impl PartialEq<Document> for Mapping {
    fn eq(&self, other: &Document) -> bool {
        self == &other.data
    }
}

/// Compares against JSON, with `null` standing for unset.
impl PartialEq<serde_json::Value> for Document {
    fn eq(&self, other: &serde_json::Value) -> bool {
        match Value::from(other.clone()) {
            Value::Map(m) => self.data == m,
            _ => false,
        }
    }
}

impl<K: Into<Key>> Index<K> for Document {
    type Output = Value;

    /// Missing fields read as unset.
    ///
    /// Indexing cannot tell an absent field from an unset one, while
    /// validation rejects the first and accepts the second. Use `get` or
    /// `contains_key` when presence matters.
    fn index(&self, key: K) -> &Value {
        self.data.get(&key.into()).unwrap_or(&UNSET)
    }
}

impl<K: Into<Key>> IndexMut<K> for Document {
    /// Missing fields are inserted as unset.
    fn index_mut(&mut self, key: K) -> &mut Value {
        self.data.entry(key.into()).or_default()
    }
}

impl<K: Into<Key>> Index<K> for Value {
    type Output = Value;

    /// Missing keys, and indexing into non-mappings, read as unset.
    ///
    /// As with documents, use `as_map` to tell an absent key from an unset
    /// value.
    fn index(&self, key: K) -> &Value {
        self.as_map()
            .and_then(|m| m.get(&key.into()))
            .unwrap_or(&UNSET)
    }
}

impl<K: Into<Key>> IndexMut<K> for Value {
    /// Missing keys are inserted as unset; an unset value becomes an empty
    /// mapping first.
    ///
    /// # Panics
    ///
    /// Panics if the value is neither a mapping nor unset.
    fn index_mut(&mut self, key: K) -> &mut Value {
        if self.is_unset() {
            *self = Value::map();
        }
        match self {
            Value::Map(m) => m.entry(key.into()).or_default(),
            other => panic!("cannot index into a value of type {}", other.type_name()),
        }
    }
}
