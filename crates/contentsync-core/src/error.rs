//! Error types for contentsync-core

use std::path::PathBuf;

use crate::model::LinkKind;

/// Result type for contentsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in contentsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A link target no longer exists upstream
    #[error("{kind} {id} not found")]
    ReferenceNotFound { kind: LinkKind, id: String },

    /// The remote fetch client failed
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The variation field contains the separator more than once
    #[error("Entry {entry_id}: field {field} value {value:?} contains the variation separator more than once")]
    MalformedVariation {
        entry_id: String,
        field: String,
        value: String,
    },

    /// Two entries of one binding produced the same document basename
    #[error("Entries {first} and {second} both map to {basename} in {collection}")]
    BasenameCollision {
        collection: String,
        basename: String,
        first: String,
        second: String,
    },

    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parsed but failed validation
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Document store error from contentsync-fs
    #[error(transparent)]
    Fs(#[from] contentsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// True for the one condition representers recover from in place.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ReferenceNotFound { .. })
    }
}
