//! Seams to the remote fetch client
//!
//! [`Resolver`] turns a [`Link`] into its target; [`EntrySource`] adds the
//! per-content-type fetch. [`MemorySource`] serves both from memory.

use std::collections::BTreeMap;

use crate::model::{Asset, Link, LinkKind, RemoteEntry, Resolved};
use crate::{Error, Result};

/// Locale selector asking the client for every locale at once.
pub const ALL_LOCALES: &str = "*";

/// Resolves links against the remote CMS.
pub trait Resolver {
    /// Fails with [`Error::ReferenceNotFound`] when the target is gone and
    /// with [`Error::Transport`] when the client itself fails.
    fn resolve(&self, link: &Link) -> Result<Resolved>;
}

/// Parameters of one entry fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchQuery {
    pub content_type: String,
    /// Link depth the client materializes inline
    pub include_depth: u32,
    pub locale: String,
}

impl FetchQuery {
    pub fn new(content_type: impl Into<String>, include_depth: u32) -> Self {
        Self {
            content_type: content_type.into(),
            include_depth,
            locale: ALL_LOCALES.to_string(),
        }
    }
}

/// A fetch client: lists entries of a content type and resolves links.
pub trait EntrySource: Resolver {
    fn fetch_entries(&self, query: &FetchQuery) -> Result<Vec<RemoteEntry>>;
}

/// Entries and assets held in memory.
///
/// Link resolution looks up every entry added, not only those of the
/// content type being fetched.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<RemoteEntry>,
    assets: BTreeMap<String, Asset>,
    failing: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: RemoteEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.insert(asset.id.clone(), asset);
        self
    }

    /// Make fetches of `content_type` fail with a transport error.
    pub fn failing(mut self, content_type: impl Into<String>, message: impl Into<String>) -> Self {
        self.failing.insert(content_type.into(), message.into());
        self
    }

    /// Drop an entry, as if it was unpublished upstream.
    pub fn remove_entry(&mut self, id: &str) {
        self.entries.retain(|entry| entry.id != id);
    }
}

impl Resolver for MemorySource {
    fn resolve(&self, link: &Link) -> Result<Resolved> {
        let not_found = || Error::ReferenceNotFound {
            kind: link.kind,
            id: link.id.clone(),
        };
        match link.kind {
            LinkKind::Entry => self
                .entries
                .iter()
                .find(|entry| entry.id == link.id)
                .cloned()
                .map(Resolved::Entry)
                .ok_or_else(not_found),
            LinkKind::Asset => self
                .assets
                .get(&link.id)
                .cloned()
                .map(Resolved::Asset)
                .ok_or_else(not_found),
        }
    }
}

impl EntrySource for MemorySource {
    fn fetch_entries(&self, query: &FetchQuery) -> Result<Vec<RemoteEntry>> {
        if let Some(message) = self.failing.get(&query.content_type) {
            return Err(Error::transport(message.clone()));
        }
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.content_type == query.content_type)
            .cloned()
            .collect())
    }
}
