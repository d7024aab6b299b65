//! In-memory document store that records every mutation

use std::collections::{BTreeMap, BTreeSet};

use crate::store::is_document_name;
use crate::{DocumentContent, DocumentStore, Error, NormalizedPath, Result};

/// A mutation recorded by [`MemoryDocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    CreatePlaceholder(NormalizedPath),
    Write(NormalizedPath),
    Delete(NormalizedPath),
}

/// Document store held in memory.
///
/// With `strict` set, writing a path that has no file yet fails, the way
/// some host stores refuse to create documents outright.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    files: BTreeMap<NormalizedPath, String>,
    ops: Vec<StoreOp>,
    strict: bool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses writes to paths without an existing file.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Seed a file without recording an operation.
    pub fn with_file(mut self, path: impl Into<NormalizedPath>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }

    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.files.get(&NormalizedPath::new(path)).map(String::as_str)
    }

    /// Every stored path, documents or not.
    pub fn paths(&self) -> BTreeSet<NormalizedPath> {
        self.files.keys().cloned().collect()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn list_document_paths(&self, collection: &NormalizedPath) -> Result<BTreeSet<NormalizedPath>> {
        let dir = collection.trimmed();
        Ok(self
            .files
            .keys()
            .filter(|path| path.parent().is_some_and(|parent| parent.as_str() == dir))
            .filter(|path| path.file_name().is_some_and(is_document_name))
            .cloned()
            .collect())
    }

    fn file_exists(&self, path: &NormalizedPath) -> bool {
        self.files.contains_key(path)
    }

    fn read_text(&self, path: &NormalizedPath) -> Result<Option<String>> {
        Ok(self.files.get(path).cloned())
    }

    fn create_placeholder(&mut self, path: &NormalizedPath) -> Result<()> {
        let text = DocumentContent::placeholder().render(path)?;
        self.files.insert(path.clone(), text);
        self.ops.push(StoreOp::CreatePlaceholder(path.clone()));
        Ok(())
    }

    fn write_document(&mut self, path: &NormalizedPath, content: &DocumentContent) -> Result<()> {
        if self.strict && !self.files.contains_key(path) {
            return Err(Error::MissingPath {
                path: path.to_string(),
            });
        }
        let text = content.render(path)?;
        self.files.insert(path.clone(), text);
        self.ops.push(StoreOp::Write(path.clone()));
        Ok(())
    }

    fn delete_document(&mut self, path: &NormalizedPath) -> Result<()> {
        self.files.remove(path);
        self.ops.push(StoreOp::Delete(path.clone()));
        Ok(())
    }
}
