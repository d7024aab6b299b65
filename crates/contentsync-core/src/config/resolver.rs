//! Configuration resolution with layered merge
//!
//! The pod root holds `contentsync.toml`; a git-ignored
//! `contentsync.local.toml` next to it overrides values, typically the
//! access tokens.

use std::fs;

use contentsync_fs::NormalizedPath;

use super::manifest::Manifest;
use crate::{Error, Result};

/// Repository configuration file name
pub const CONFIG_FILE: &str = "contentsync.toml";
/// Local override file name
pub const LOCAL_CONFIG_FILE: &str = "contentsync.local.toml";

/// Resolves the manifest for a pod by merging its config layers.
pub struct ConfigResolver {
    root: NormalizedPath,
}

impl ConfigResolver {
    pub fn new(root: NormalizedPath) -> Self {
        Self { root }
    }

    pub fn config_path(&self) -> NormalizedPath {
        self.root.join(CONFIG_FILE)
    }

    pub fn local_config_path(&self) -> NormalizedPath {
        self.root.join(LOCAL_CONFIG_FILE)
    }

    pub fn has_config(&self) -> bool {
        self.config_path().is_file()
    }

    /// Load and merge both layers.
    ///
    /// Tables merge key by key with the local layer winning; any other
    /// value, arrays included, is replaced wholesale. The repository file
    /// is required, the local file is optional.
    pub fn resolve(&self) -> Result<Manifest> {
        let config_path = self.config_path();
        if !config_path.is_file() {
            return Err(Error::ConfigNotFound {
                path: config_path.to_native(),
            });
        }

        tracing::debug!(path = %config_path, "Loading repository config");
        let mut merged: toml::Table = toml::from_str(&fs::read_to_string(config_path.to_native())?)?;

        let local_path = self.local_config_path();
        if local_path.is_file() {
            tracing::debug!(path = %local_path, "Loading local config overrides");
            let local: toml::Table = toml::from_str(&fs::read_to_string(local_path.to_native())?)?;
            deep_merge(&mut merged, local);
        }

        let manifest: Manifest = toml::Value::Table(merged).try_into()?;
        manifest.validate()?;
        Ok(manifest)
    }
}

fn deep_merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let overlay_table = match value {
            toml::Value::Table(table) => table,
            other => {
                base.insert(key, other);
                continue;
            }
        };
        if let Some(toml::Value::Table(base_table)) = base.get_mut(&key) {
            deep_merge(base_table, overlay_table);
            continue;
        }
        base.insert(key, toml::Value::Table(overlay_table));
    }
}
