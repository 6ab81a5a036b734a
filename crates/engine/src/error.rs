//! Error taxonomy of a rebase run.

use crate::range::{IdKind, RangeSpec};
use crate::rebase::RebaseProgress;
use metadata::{AclError, MetadataError};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walk::WalkError;

/// Exit code for usage, precondition, scan and mutation failures.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Exit code for configurations the rebase refuses to handle.
pub const UNSUPPORTED_EXIT_CODE: i32 = 2;

/// Failure of the read-only scan pass. Nothing has been modified.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The traversal itself failed.
    #[error(transparent)]
    Walk(#[from] WalkError),
    /// Probing an entry for ACLs failed for a reason other than absence.
    #[error(transparent)]
    AclProbe(#[from] MetadataError),
}

impl ScanError {
    /// Path being visited when the scan failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Walk(error) => error.path(),
            Self::AclProbe(error) => error.path(),
        }
    }

    /// Underlying I/O failure.
    #[must_use]
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::Walk(error) => error.io_error(),
            Self::AclProbe(error) => error.source_error(),
        }
    }
}

/// Reason a shift was rejected before any mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum UnsupportedReason {
    /// Group ids start below user ids, so one shared shift cannot apply.
    #[error("the minimal gid {gid_min} is lower than the minimal uid {uid_min}, this case is not supported")]
    GidBelowUid {
        /// Lowest observed uid.
        uid_min: u32,
        /// Lowest observed gid.
        gid_min: u32,
    },
    /// Ranges overlap and hard links make already-shifted entries ambiguous.
    #[error(
        "destination range {destination} and origin range {origin} overlap and there are hard links, this case is not supported"
    )]
    OverlapWithHardLinks {
        /// Ids before the shift.
        origin: RangeSpec,
        /// Ids after the shift.
        destination: RangeSpec,
    },
}

/// A shifted maximum id would not fit in 32 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("cannot shift by {difference}: the {kind} value {max} would overflow")]
pub struct RangeOverflow {
    kind: IdKind,
    max: u32,
    difference: i64,
}

impl RangeOverflow {
    pub(crate) const fn new(kind: IdKind, max: u32, difference: i64) -> Self {
        Self {
            kind,
            max,
            difference,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> IdKind {
        self.kind
    }

    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    #[must_use]
    pub const fn difference(&self) -> i64 {
        self.difference
    }
}

/// What stopped the rebase pass.
#[derive(Debug, Error)]
pub enum AbortCause {
    /// The second traversal could not continue.
    #[error(transparent)]
    Traversal(#[from] WalkError),
    /// Changing ownership, restoring the mode, or writing an ACL failed.
    #[error(transparent)]
    Mutation(MetadataError),
    /// An ACL qualifier would leave the id space. That ACL is unchanged.
    #[error(transparent)]
    AclRange(AclError),
    /// Reading or decoding an ACL failed; the environment cannot be trusted.
    #[error("unrecoverable ACL failure: {0}")]
    Unrecoverable(AclError),
    /// The entry's ownership lies outside what the scan observed.
    #[error("ownership {uid}:{gid} changed since the scan")]
    StaleOwnership {
        /// Current owner.
        uid: u32,
        /// Current group.
        gid: u32,
    },
}

impl From<AclError> for AbortCause {
    fn from(error: AclError) -> Self {
        match error {
            AclError::Write { source, .. } => Self::Mutation(source),
            AclError::OutOfRange { .. } => Self::AclRange(error),
            AclError::Read { .. } | AclError::Malformed { .. } => Self::Unrecoverable(error),
        }
    }
}

/// Fail-fast stop of the rebase pass.
///
/// Entries visited before `path` keep their new ownership.
#[derive(Debug, Error)]
#[error("rebase aborted at '{}' after {} files: {cause}", path.display(), progress.files())]
pub struct RebaseAbort {
    path: PathBuf,
    progress: RebaseProgress,
    #[source]
    cause: AbortCause,
}

impl RebaseAbort {
    pub(crate) fn new(path: PathBuf, progress: RebaseProgress, cause: AbortCause) -> Self {
        Self {
            path,
            progress,
            cause,
        }
    }

    /// Entry being processed when the pass stopped.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Work completed before the failure.
    #[must_use]
    pub const fn progress(&self) -> &RebaseProgress {
        &self.progress
    }

    #[must_use]
    pub const fn cause(&self) -> &AbortCause {
        &self.cause
    }

    /// Reports whether the failure is the unrecoverable kind.
    #[must_use]
    pub const fn is_unrecoverable(&self) -> bool {
        matches!(self.cause, AbortCause::Unrecoverable(_))
    }
}

/// Terminal failure of a rebase run.
#[derive(Debug, Error)]
pub enum RebaseError {
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Unsupported(UnsupportedReason),
    #[error(transparent)]
    Overflow(RangeOverflow),
    #[error(transparent)]
    Aborted(Box<RebaseAbort>),
}

impl RebaseError {
    /// Process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Unsupported(_) | Self::Overflow(_) => UNSUPPORTED_EXIT_CODE,
            Self::Scan(_) | Self::Aborted(_) => FAILURE_EXIT_CODE,
        }
    }

    /// Reports whether the filesystem is guaranteed untouched.
    #[must_use]
    pub const fn is_side_effect_free(&self) -> bool {
        !matches!(self, Self::Aborted(_))
    }
}

impl From<UnsupportedReason> for RebaseError {
    fn from(reason: UnsupportedReason) -> Self {
        Self::Unsupported(reason)
    }
}

impl From<RangeOverflow> for RebaseError {
    fn from(overflow: RangeOverflow) -> Self {
        Self::Overflow(overflow)
    }
}

impl From<RebaseAbort> for RebaseError {
    fn from(abort: RebaseAbort) -> Self {
        Self::Aborted(Box::new(abort))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadata::{AclKind, PosixAcl};

    #[test]
    fn exit_codes_follow_failure_class() {
        let unsupported = RebaseError::from(UnsupportedReason::GidBelowUid {
            uid_min: 100,
            gid_min: 50,
        });
        assert_eq!(unsupported.exit_code(), UNSUPPORTED_EXIT_CODE);
        assert!(unsupported.is_side_effect_free());

        let overflow = RebaseError::from(RangeOverflow::new(IdKind::Group, u32::MAX, 1));
        assert_eq!(overflow.exit_code(), UNSUPPORTED_EXIT_CODE);

        let aborted = RebaseError::from(RebaseAbort::new(
            PathBuf::from("/export/vol1/a"),
            RebaseProgress::default(),
            AbortCause::StaleOwnership { uid: 1, gid: 1 },
        ));
        assert_eq!(aborted.exit_code(), FAILURE_EXIT_CODE);
        assert!(!aborted.is_side_effect_free());
    }

    #[test]
    fn acl_errors_are_classified() {
        let write = AclError::Write {
            kind: AclKind::Access,
            source: MetadataError::new(
                "write ACL attribute",
                Path::new("/x"),
                io::Error::from(io::ErrorKind::PermissionDenied),
            ),
        };
        assert!(matches!(AbortCause::from(write), AbortCause::Mutation(_)));

        let range = AclError::OutOfRange {
            path: PathBuf::from("/x"),
            kind: AclKind::Access,
            source: PosixAcl::from_entries(vec![metadata::acl::AclEntry::new(
                metadata::acl::AclTag::Group,
                4,
                1,
            )])
            .shifted(-2)
            .expect_err("underflow"),
        };
        assert!(matches!(AbortCause::from(range), AbortCause::AclRange(_)));

        let read = AclError::Read {
            kind: AclKind::Default,
            source: MetadataError::new("read ACL attribute", Path::new("/x"), io::Error::other("eio")),
        };
        let cause = AbortCause::from(read);
        assert!(matches!(cause, AbortCause::Unrecoverable(_)));
        assert!(cause.to_string().starts_with("unrecoverable ACL failure: "));
    }

    #[test]
    fn overflow_message_names_kind() {
        let overflow = RangeOverflow::new(IdKind::User, 4_294_967_000, 1000);
        assert_eq!(
            overflow.to_string(),
            "cannot shift by 1000: the uid value 4294967000 would overflow"
        );
    }
}
