use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A metadata call on one path failed.
///
/// `context` is a short verb phrase such as `"change ownership"` and reads
/// naturally after "cannot".
#[derive(Debug, Error)]
#[error("cannot {context} {}: {source}", path.display())]
pub struct MetadataError {
    context: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl MetadataError {
    pub fn new(context: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            context,
            path: path.to_owned(),
            source,
        }
    }

    #[must_use]
    pub const fn context(&self) -> &'static str {
        self.context
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The errno-carrying failure, for callers that branch on its kind.
    #[must_use]
    pub fn source_error(&self) -> &io::Error {
        &self.source
    }
}
