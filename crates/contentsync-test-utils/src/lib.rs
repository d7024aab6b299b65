//! Shared test utilities for the contentsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`content`] - builders for remote entries and assets
//! - [`pod`] - [`TestPod`], a temporary pod directory

pub mod content;
pub mod pod;

pub use content::{AssetBuilder, EntryBuilder};
pub use pod::TestPod;
