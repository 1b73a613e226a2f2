//! Store boundary
//!
//! The persistent store is an outside collaborator. It sees plain mappings
//! only: documents are validated before a snapshot is handed over, and
//! loaded mappings are wrapped without any checks.

use std::sync::Arc;

use crate::document::{Document, Key, Mapping};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{DocResult, SchemaTree};

/// Save/load contract over plain mappings.
pub trait DocumentStore {
    /// Persists a validated snapshot.
    fn save(&mut self, snapshot: Mapping) -> DocResult<()>;

    /// Loads the mapping stored under `key`, if any.
    fn load(&self, key: &Key) -> DocResult<Option<Mapping>>;
}

impl Document {
    /// Validates the document, then hands a snapshot to `store`.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before the store is touched.
    pub fn save_to<S: DocumentStore + ?Sized>(&self, store: &mut S) -> DocResult<()> {
        self.validate()?;
        store.save(self.snapshot())?;
        let fields = self.len().to_string();
        log_event_with_fields(Event::DocumentSaved, &[("fields", fields.as_str())]);
        Ok(())
    }

    /// Loads the mapping under `key` and wraps it as a seeded document.
    pub fn load_from<S: DocumentStore + ?Sized>(
        tree: Arc<SchemaTree>,
        store: &S,
        key: &Key,
    ) -> DocResult<Option<Document>> {
        let Some(data) = store.load(key)? else {
            return Ok(None);
        };
        let key = key.to_string();
        log_event_with_fields(Event::DocumentLoaded, &[("key", key.as_str())]);
        Ok(Some(Document::new(tree, Some(data))))
    }
}
