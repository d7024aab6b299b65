//! Pod detection and loading
//!
//! Commands work from anywhere inside a pod: the root is the nearest
//! ancestor holding `contentsync.toml`, unless `--pod` names it.

use std::path::{Path, PathBuf};

use contentsync_client::ContentfulClient;
use contentsync_core::config::{CONFIG_FILE, ConfigResolver};
use contentsync_core::{Manifest, SyncEngine};
use contentsync_fs::{FsDocumentStore, NormalizedPath};

use crate::error::{CliError, Result};

/// Walk up from `start` to the first directory holding the config file.
pub fn find_pod_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

/// The pod root named by `--pod`, or the one enclosing the current
/// directory.
pub fn resolve_pod_root(pod: Option<&Path>) -> Result<PathBuf> {
    match pod {
        Some(dir) => dunce::canonicalize(dir)
            .map_err(|e| CliError::user(format!("Pod directory {}: {}", dir.display(), e))),
        None => {
            let cwd = dunce::canonicalize(std::env::current_dir()?)?;
            find_pod_root(&cwd).ok_or_else(|| {
                CliError::user(format!(
                    "No {} found in {} or any parent directory",
                    CONFIG_FILE,
                    cwd.display()
                ))
            })
        }
    }
}

/// A pod root and its resolved manifest.
pub struct Pod {
    pub root: NormalizedPath,
    pub manifest: Manifest,
}

impl Pod {
    pub fn load(pod: Option<&Path>, access_token: Option<&str>) -> Result<Self> {
        let root = NormalizedPath::new(resolve_pod_root(pod)?);
        tracing::debug!(root = %root, "Loading pod");
        let mut manifest = ConfigResolver::new(root.clone()).resolve()?;
        if let Some(token) = access_token.filter(|token| !token.is_empty()) {
            manifest.contentful.access_token = token.to_string();
        }
        Ok(Self { root, manifest })
    }

    pub fn store(&self) -> FsDocumentStore {
        FsDocumentStore::new(self.root.clone())
    }

    /// A sync engine wired to the Delivery API and the pod's files.
    pub fn engine(&self) -> Result<SyncEngine> {
        self.manifest.validate_remote()?;
        let client = ContentfulClient::new(&self.manifest.contentful, &self.manifest.default_locale)?;
        Ok(SyncEngine::new(
            self.manifest.clone(),
            Box::new(client),
            Box::new(self.store()),
        ))
    }
}
