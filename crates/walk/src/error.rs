use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Traversal step that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStage {
    /// `lstat` of the traversal root.
    Root,
    /// Opening a directory for listing.
    OpenDirectory,
    /// Reading the next name out of an open directory.
    ListDirectory,
    /// `lstat` of a listed entry.
    Inspect,
}

impl fmt::Display for WalkStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Root => "inspect traversal root",
            Self::OpenDirectory => "open directory",
            Self::ListDirectory => "list directory",
            Self::Inspect => "inspect",
        })
    }
}

/// A failed traversal step. The walker yields nothing after one.
#[derive(Debug, Error)]
#[error("cannot {stage} '{}': {source}", path.display())]
pub struct WalkError {
    stage: WalkStage,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl WalkError {
    pub(crate) fn new(stage: WalkStage, path: PathBuf, source: io::Error) -> Self {
        Self {
            stage,
            path,
            source,
        }
    }

    /// Step that failed.
    #[must_use]
    pub const fn stage(&self) -> WalkStage {
        self.stage
    }

    /// Path being inspected or listed when the step failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying I/O failure.
    #[must_use]
    pub fn io_error(&self) -> &io::Error {
        &self.source
    }
}
