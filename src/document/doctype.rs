//! Document types declared in code
//!
//! A Rust type implements `SchemaDocument` to declare its structure. The
//! structure is parsed the first time it is needed and the tree is cached
//! process-wide for that type; a declaration that fails to parse is not
//! cached and fails again on every use.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::config::DocumentOptions;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{DocResult, Declaration, SchemaTree};

use super::instance::Document;
use super::value::Mapping;

type TreeCache = RwLock<HashMap<TypeId, Arc<SchemaTree>>>;

fn tree_cache() -> &'static TreeCache {
    static CACHE: OnceLock<TreeCache> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// A document type with a declared structure.
///
/// ```ignore
/// struct BlogPost;
///
/// impl SchemaDocument for BlogPost {
///     fn structure() -> Option<Declaration> {
///         Some(Declaration::map().field("title", FieldType::Unicode))
///     }
/// }
///
/// let post = BlogPost::create()?;
/// ```
pub trait SchemaDocument: 'static {
    /// The raw structure; `None` means none was declared.
    fn structure() -> Option<Declaration>;

    /// Declaration options; dot notation is off by default.
    fn options() -> DocumentOptions {
        DocumentOptions::default()
    }

    /// The parsed tree for this type, built once.
    fn schema() -> DocResult<Arc<SchemaTree>> {
        schema_for::<Self>()
    }

    /// Creates a skeleton document.
    fn create() -> DocResult<Document> {
        Ok(Document::new(Self::schema()?, None))
    }

    /// Creates a document holding exactly `data`.
    fn from_mapping(data: Mapping) -> DocResult<Document> {
        Ok(Document::new(Self::schema()?, Some(data)))
    }
}

/// Returns the cached tree of `T`, parsing its declaration on first use.
pub fn schema_for<T: SchemaDocument + ?Sized>() -> DocResult<Arc<SchemaTree>> {
    let id = TypeId::of::<T>();

    if let Some(tree) = tree_cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
    {
        return Ok(Arc::clone(tree));
    }

    let raw = T::structure();
    let tree = SchemaTree::declare(raw.as_ref(), T::options())?;

    let mut cache = tree_cache().write().unwrap_or_else(PoisonError::into_inner);
    // Another caller may have won the race; keep the first tree
    let tree = Arc::clone(cache.entry(id).or_insert(tree));
    drop(cache);

    log_event_with_fields(Event::DocumentTypeCached, &[("type", type_name::<T>())]);
    Ok(tree)
}
