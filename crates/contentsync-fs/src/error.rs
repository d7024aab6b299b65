//! Error types for contentsync-fs

use std::path::PathBuf;

/// Result type for contentsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in contentsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document at {path}: {message}")]
    DocumentParse { path: String, message: String },

    #[error("Failed to serialize document at {path}: {message}")]
    DocumentSerialize { path: String, message: String },

    #[error("Unsupported format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Refusing to write {path}: no file exists at that path")]
    MissingPath { path: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
