//! [`TestPod`]: a temporary pod directory for store and CLI tests.

use std::fs;
use std::path::{Path, PathBuf};

use contentsync_fs::FsDocumentStore;
use tempfile::TempDir;

/// A temporary pod root with helpers for setup and assertions.
///
/// # Example
///
/// ```rust,no_run
/// use contentsync_test_utils::TestPod;
///
/// let pod = TestPod::new();
/// pod.write_config("[[bind]]\ncollection = \"/content/posts/\"\ncontent_type = \"post\"\n");
/// pod.write_file("content/posts/_blueprint.yaml", "$path: /{base}/\n");
/// pod.assert_file_exists("contentsync.toml");
/// ```
pub struct TestPod {
    temp_dir: TempDir,
}

impl Default for TestPod {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPod {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative.trim_start_matches('/'))
    }

    /// Write `contentsync.toml`.
    pub fn write_config(&self, content: &str) {
        self.write_file("contentsync.toml", content);
    }

    /// Write `contentsync.local.toml`.
    pub fn write_local_config(&self, content: &str) {
        self.write_file("contentsync.local.toml", content);
    }

    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("failed to read {relative}: {e}"))
    }

    /// Parse a YAML document of the pod.
    pub fn read_yaml(&self, relative: &str) -> serde_yaml::Value {
        serde_yaml::from_str(&self.read_file(relative))
            .unwrap_or_else(|e| panic!("{relative} is not YAML: {e}"))
    }

    pub fn store(&self) -> FsDocumentStore {
        FsDocumentStore::new(self.root())
    }

    pub fn assert_file_exists(&self, relative: &str) {
        assert!(self.path(relative).is_file(), "expected {relative} to exist");
    }

    pub fn assert_file_missing(&self, relative: &str) {
        assert!(!self.path(relative).exists(), "expected {relative} to be absent");
    }
}
