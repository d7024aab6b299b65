//! Filesystem layer for contentsync
//!
//! Provides normalized pod paths, atomic I/O, the document file format
//! and the [`DocumentStore`] seam the reconciler writes through.

pub mod document;
pub mod error;
pub mod io;
pub mod memory;
pub mod path;
pub mod store;

pub use document::{DocumentContent, DocumentFormat};
pub use error::{Error, Result};
pub use memory::{MemoryDocumentStore, StoreOp};
pub use path::NormalizedPath;
pub use store::{DocumentStore, FsDocumentStore, is_document_name, is_reserved_name};
