//! Document store seam and its file-backed implementation

use std::collections::BTreeSet;
use std::fs;

use crate::{DocumentContent, DocumentFormat, Error, NormalizedPath, Result, io};

/// Storage for collection documents, addressed by pod path.
///
/// Pod paths are absolute within the pod (`/content/posts/abc.yaml`).
pub trait DocumentStore {
    /// Documents directly inside a collection. Not recursive: nested
    /// collections are not listed.
    fn list_document_paths(&self, collection: &NormalizedPath) -> Result<BTreeSet<NormalizedPath>>;

    /// Whether any file exists at `path`.
    fn file_exists(&self, path: &NormalizedPath) -> bool;

    /// The stored text at `path`, if the file exists.
    fn read_text(&self, path: &NormalizedPath) -> Result<Option<String>>;

    /// Materialize an empty document at `path`.
    fn create_placeholder(&mut self, path: &NormalizedPath) -> Result<()>;

    /// Create or overwrite the document at `path`.
    fn write_document(&mut self, path: &NormalizedPath, content: &DocumentContent) -> Result<()>;

    /// Remove the document at `path`.
    fn delete_document(&mut self, path: &NormalizedPath) -> Result<()>;
}

/// Names starting with `_` (collection blueprints) or `.` (temp files).
pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

/// Whether a file name is a document the store manages.
///
/// Reserved names and files of unknown formats are never listed, so
/// reconciliation never deletes them.
pub fn is_document_name(name: &str) -> bool {
    if is_reserved_name(name) {
        return false;
    }
    DocumentFormat::from_path(&NormalizedPath::new(name)).is_ok()
}

/// Document store over a pod directory on disk.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: NormalizedPath,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Native location of a pod path under the pod root.
    pub fn resolve(&self, path: &NormalizedPath) -> NormalizedPath {
        self.root.join(path.relative())
    }
}

impl DocumentStore for FsDocumentStore {
    fn list_document_paths(&self, collection: &NormalizedPath) -> Result<BTreeSet<NormalizedPath>> {
        let dir = self.resolve(collection);
        let mut paths = BTreeSet::new();
        if !dir.is_dir() {
            tracing::debug!(collection = %collection, "Collection directory missing; nothing to list");
            return Ok(paths);
        }

        let entries = fs::read_dir(dir.to_native()).map_err(|e| Error::io(dir.to_native(), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(dir.to_native(), e))?;
            // Not recursive: nested directories belong to other collections
            let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if is_document_name(&name) {
                paths.insert(collection.join(&name));
            }
        }
        Ok(paths)
    }

    fn file_exists(&self, path: &NormalizedPath) -> bool {
        self.resolve(path).is_file()
    }

    fn read_text(&self, path: &NormalizedPath) -> Result<Option<String>> {
        let native = self.resolve(path);
        if !native.is_file() {
            return Ok(None);
        }
        io::read_text(&native).map(Some)
    }

    fn create_placeholder(&mut self, path: &NormalizedPath) -> Result<()> {
        let text = DocumentContent::placeholder().render(path)?;
        io::write_text(&self.resolve(path), &text)
    }

    fn write_document(&mut self, path: &NormalizedPath, content: &DocumentContent) -> Result<()> {
        let text = content.render(path)?;
        io::write_text(&self.resolve(path), &text)
    }

    fn delete_document(&mut self, path: &NormalizedPath) -> Result<()> {
        io::remove_file(&self.resolve(path))
    }
}
