use std::fs;
use std::path::{Path, PathBuf};

/// One object found by the walk, described by `lstat`.
#[derive(Debug)]
pub struct WalkEntry {
    pub(crate) path: PathBuf,
    pub(crate) metadata: fs::Metadata,
    pub(crate) depth: usize,
    pub(crate) is_root: bool,
}

impl WalkEntry {
    /// Path of the entry: the root as given, or the root joined with the
    /// names leading to the entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `lstat` metadata captured when the entry was reached.
    #[must_use]
    pub fn metadata(&self) -> &fs::Metadata {
        &self.metadata
    }

    /// Number of directories between the root and the entry; the root is `0`.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Whether this is the traversal root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.is_root
    }

    /// Splits the entry into its path and metadata.
    #[must_use]
    pub fn into_parts(self) -> (PathBuf, fs::Metadata) {
        (self.path, self.metadata)
    }
}
