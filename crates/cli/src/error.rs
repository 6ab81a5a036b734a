use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures detected by the front-end before the tree is scanned.
#[derive(Debug, Error)]
pub enum CliError {
    /// `-b` was not given.
    #[error("a destination base is required (-b BASE).")]
    MissingBase,
    /// The `-b` value is not a valid base.
    #[error("illegal input for offset: '{value}'.")]
    InvalidBase {
        /// Value as given on the command line.
        value: String,
    },
    /// No tree root, or more than one, was given.
    #[error("exactly one tree root must be given.")]
    TreeRootCount,
    /// The tree root is relative.
    #[error("The basepath must be absolute.")]
    RelativeTreeRoot,
    /// The tree root cannot be resolved.
    #[error("The path cannot be matched to the filesystem: {}: {source}", path.display())]
    UnresolvableTreeRoot {
        /// Path as given.
        path: PathBuf,
        /// Resolution failure.
        source: io::Error,
    },
    /// The tree root is not a directory.
    #[error("The given basepath is not a directory: {}", path.display())]
    NotADirectory {
        /// Resolved path.
        path: PathBuf,
    },
    /// The effective user is not root.
    #[error("This program only runs with root privileges.")]
    NotPrivileged,
    /// The ownership self-test under the tree root failed.
    #[error("{step}: {}: {source}", path.display())]
    Probe {
        /// What the self-test could not do.
        step: ProbeStep,
        /// Probe file path.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
}

impl CliError {
    /// Reports whether the usage text should follow the message.
    #[must_use]
    pub const fn wants_usage(&self) -> bool {
        matches!(
            self,
            Self::MissingBase | Self::InvalidBase { .. } | Self::TreeRootCount
        )
    }
}

/// Stage of the ownership self-test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeStep {
    Create,
    ChangeOwner,
    Remove,
}

impl std::fmt::Display for ProbeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Create => {
                "The program is unable to create its access testing file under the basepath"
            }
            Self::ChangeOwner => {
                "The program is not able to change ownership of its testing file"
            }
            Self::Remove => "The program is not able to remove its testing file",
        })
    }
}
