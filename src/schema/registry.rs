//! Structure registry
//!
//! Keeps one parsed schema tree per named document type:
//! - Declarations registered in code or loaded from `<dir>/*.json`
//! - One file per document type, file stem is the default name
//! - A registered name is immutable; registering it twice fails

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::config::DocumentOptions;
use crate::document::{Document, Mapping};
use crate::observability::{log_event_with_fields, Event};

use super::declaration::Declaration;
use super::errors::{DocResult, DocumentError};
use super::types::SchemaTree;

/// On-disk form of one document type declaration.
#[derive(Debug, Deserialize)]
struct DeclarationFile {
    /// Document type name; defaults to the file stem
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    options: DocumentOptions,
    /// Raw structure; absent or null is rejected at parse time
    #[serde(default)]
    structure: Option<serde_json::Value>,
}

/// Registry of declared document types.
pub struct StructureRegistry {
    /// Directory containing declaration files
    structure_dir: PathBuf,
    /// Parsed trees indexed by document type name
    trees: HashMap<String, Arc<SchemaTree>>,
}

impl StructureRegistry {
    /// Creates an empty registry reading declarations from `structure_dir`.
    pub fn new(structure_dir: &Path) -> Self {
        Self {
            structure_dir: structure_dir.to_path_buf(),
            trees: HashMap::new(),
        }
    }

    /// Returns the declaration directory path.
    pub fn structure_dir(&self) -> &Path {
        &self.structure_dir
    }

    /// Loads every declaration file in the directory.
    ///
    /// A missing directory holds no declarations. Any unreadable or
    /// malformed file aborts the load.
    pub fn load_all(&mut self) -> DocResult<()> {
        if !self.structure_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.structure_dir).map_err(|e| {
            DocumentError::declaration_file(
                self.structure_dir.display().to_string(),
                format!("failed to read directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                DocumentError::declaration_file(
                    self.structure_dir.display().to_string(),
                    format!("failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }

        // Directory order is platform dependent
        paths.sort();
        for path in &paths {
            self.load_file(path)?;
        }

        let dir = self.structure_dir.display().to_string();
        let count = self.trees.len().to_string();
        log_event_with_fields(
            Event::RegistryLoaded,
            &[("dir", dir.as_str()), ("types", count.as_str())],
        );

        Ok(())
    }

    /// Loads a single declaration file and registers it.
    pub fn load_file(&mut self, path: &Path) -> DocResult<Arc<SchemaTree>> {
        let content = fs::read_to_string(path).map_err(|e| {
            DocumentError::declaration_file(
                path.display().to_string(),
                format!("failed to read file: {}", e),
            )
        })?;

        let file: DeclarationFile = serde_json::from_str(&content).map_err(|e| {
            DocumentError::declaration_file(
                path.display().to_string(),
                format!("invalid JSON: {}", e),
            )
        })?;

        let name = match file.name {
            Some(name) => name,
            None => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    DocumentError::declaration_file(path.display().to_string(), "no file name")
                })?,
        };

        let raw = file.structure.as_ref().map(Declaration::from_json).transpose()?;
        self.register(name, raw.as_ref(), file.options)
    }

    /// Parses and registers a declaration under `name`.
    ///
    /// # Errors
    ///
    /// Fails with a structure error if the declaration is invalid or the
    /// name is already registered.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        raw: Option<&Declaration>,
        options: DocumentOptions,
    ) -> DocResult<Arc<SchemaTree>> {
        let name = name.into();

        // Declared structures are immutable
        if self.trees.contains_key(&name) {
            return Err(DocumentError::already_declared(&name));
        }

        let tree = SchemaTree::declare(raw, options)?;
        self.trees.insert(name, Arc::clone(&tree));
        Ok(tree)
    }

    /// Gets the tree declared under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<SchemaTree>> {
        self.trees.get(name).cloned()
    }

    /// Checks if a document type is declared.
    pub fn exists(&self, name: &str) -> bool {
        self.trees.contains_key(name)
    }

    /// Returns the declared names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.trees.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of declared document types.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Creates a document of the named type.
    ///
    /// `data` of `None` builds a skeleton; otherwise the document wraps
    /// `data` unchanged.
    pub fn new_document(&self, name: &str, data: Option<Mapping>) -> DocResult<Document> {
        let tree = self.get(name).ok_or_else(|| DocumentError::unknown_structure(name))?;
        Ok(Document::new(tree, data))
    }
}
