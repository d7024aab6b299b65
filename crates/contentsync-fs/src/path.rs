//! Normalized path handling for pod and collection paths

use std::path::{Path, PathBuf};

/// A path normalized to forward slashes with `.` and `..` segments collapsed.
///
/// Pod paths such as `/content/posts/hello.yaml` are stored in this form so
/// that the set of existing documents and the set of produced documents
/// compare by plain string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Backslashes become forward slashes, empty and `.` segments are
    /// dropped, and `..` pops the previous segment. A `..` with nothing left
    /// to pop is discarded, so a normalized path never climbs above its root.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        let absolute = raw.starts_with('/');
        let trailing = raw.len() > 1 && raw.ends_with('/');

        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }

        let mut inner = segments.join("/");
        if absolute {
            inner.insert(0, '/');
        }
        if trailing && !segments.is_empty() {
            inner.push('/');
        }
        Self { inner }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self::new(format!("{}/{}", self.inner.trim_end_matches('/'), segment))
    }

    /// The same path without a trailing slash.
    ///
    /// Collection paths are configured both as `/content/posts` and
    /// `/content/posts/`; comparisons go through this form.
    pub fn trimmed(&self) -> &str {
        if self.inner == "/" {
            return &self.inner;
        }
        self.inner.trim_end_matches('/')
    }

    /// Segment-aware prefix test: `/content/posts/a.yaml` starts with
    /// `/content/posts/` but `/content/postscript` does not.
    pub fn starts_with(&self, prefix: &NormalizedPath) -> bool {
        let prefix = prefix.trimmed();
        let this = self.trimmed();
        if prefix == "/" {
            return this.starts_with('/');
        }
        this == prefix
            || (this.starts_with(prefix) && this.as_bytes().get(prefix.len()) == Some(&b'/'))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) if trimmed.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// File name without its extension.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[..idx]),
            _ => Some(name),
        }
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Relative form with the leading slash removed, used to place a pod
    /// path under a pod root on disk.
    pub fn relative(&self) -> &str {
        self.inner.trim_start_matches('/')
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
