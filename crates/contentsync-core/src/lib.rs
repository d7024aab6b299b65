//! Core of contentsync: turns CMS entries into collection documents
//!
//! - **Locale normalization**: CMS locale codes to builder locale codes
//! - **Localization tagging**: per-locale values as `{field}@{locale}` keys
//! - **Representers**: links, entries and assets to plain YAML values
//! - **Transformer**: builtin renames, variation split, metadata stamping
//! - **Reconciler**: make a collection mirror the fetched entry set
//! - **SyncEngine**: run every configured binding
//!
//! # Architecture
//!
//! ```text
//!                 contentsync-cli
//!                  |           |
//!        contentsync-core   contentsync-client
//!                  |           |
//!                 contentsync-fs
//! ```
//!
//! The fetch client is injected through [`EntrySource`]; documents are
//! written through [`contentsync_fs::DocumentStore`].

pub mod config;
pub mod edit_url;
pub mod error;
pub mod locale;
pub mod localize;
pub mod model;
pub mod reconcile;
pub mod represent;
pub mod resolver;
pub mod sync;
pub mod transform;

pub use config::{Binding, ConfigResolver, ContentfulSection, Manifest};
pub use error::{Error, Result};
pub use locale::{LocaleNormalizer, LocaleRewriteRule};
pub use localize::{LocaleSet, tag_localized_fields};
pub use model::{Asset, FieldValue, Fields, Link, LinkKind, LocalizedFields, RemoteEntry, Resolved};
pub use reconcile::{CollisionPolicy, ReconcileOptions, ReconcilePlan, Reconciler, WriteAction};
pub use represent::Representer;
pub use resolver::{EntrySource, FetchQuery, MemorySource, Resolver};
pub use sync::{BindingReport, SyncEngine, SyncOptions, SyncReport};
pub use transform::{LocalDocument, Transformer, VariationConfig};
