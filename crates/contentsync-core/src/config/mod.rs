//! Configuration: the manifest schema and its layered resolution
//!
//! Configuration is loaded from the pod root and merged in order:
//!
//! 1. **Repository config** - `contentsync.toml`
//! 2. **Local overrides** - `contentsync.local.toml` (git-ignored)
//!
//! # Example
//!
//! ```ignore
//! use contentsync_core::config::ConfigResolver;
//! use contentsync_fs::NormalizedPath;
//!
//! let manifest = ConfigResolver::new(NormalizedPath::new("/path/to/pod")).resolve()?;
//! for binding in &manifest.bindings {
//!     println!("{} <- {}", binding.collection_path, binding.content_type);
//! }
//! ```

mod manifest;
mod resolver;

pub use manifest::{Binding, ContentfulSection, Manifest};
pub use resolver::{CONFIG_FILE, ConfigResolver, LOCAL_CONFIG_FILE};
