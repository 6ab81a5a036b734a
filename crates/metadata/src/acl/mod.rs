//! POSIX ACL detection and qualifier rebasing.
//!
//! ACLs are handled at the attribute level: the presence check probes the
//! `system.posix_acl_access` and `system.posix_acl_default` names, and the
//! rebaser decodes their values with [`PosixAcl`], shifts the named
//! qualifiers, and writes the re-encoded value back. Neither operation
//! dereferences a symbolic link.

mod codec;

#[cfg(all(feature = "acl", target_os = "linux"))]
mod linux;
#[cfg(not(all(feature = "acl", target_os = "linux")))]
mod noop;

pub use codec::{
    ACL_UNDEFINED_ID, ACL_XATTR_VERSION, AclDecodeError, AclEntry, AclTag, PosixAcl,
    QualifierOutOfRange,
};

#[cfg(all(feature = "acl", target_os = "linux"))]
pub use linux::{has_extended_acls, read_acl, rebase_acls, write_acl};
#[cfg(not(all(feature = "acl", target_os = "linux")))]
pub use noop::{has_extended_acls, read_acl, rebase_acls, write_acl};

use crate::MetadataError;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which of the two ACLs attached to an entry is being handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AclKind {
    /// The ACL consulted for access checks.
    Access,
    /// The ACL inherited by new children of a directory.
    Default,
}

impl AclKind {
    /// Name of the extended attribute storing this ACL.
    #[must_use]
    pub const fn xattr_name(self) -> &'static str {
        match self {
            Self::Access => "system.posix_acl_access",
            Self::Default => "system.posix_acl_default",
        }
    }

    /// ACL kinds attached to an entry, in rebase order.
    #[must_use]
    pub const fn for_entry(is_dir: bool) -> &'static [AclKind] {
        if is_dir {
            &[Self::Default, Self::Access]
        } else {
            &[Self::Access]
        }
    }
}

impl fmt::Display for AclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Access => "access",
            Self::Default => "default",
        })
    }
}

/// Failure while rebasing the ACLs of a single path.
#[derive(Debug, Error)]
pub enum AclError {
    /// The ACL could not be read.
    #[error("cannot read {kind} ACL: {source}")]
    Read {
        kind: AclKind,
        #[source]
        source: MetadataError,
    },
    /// The rewritten ACL could not be stored.
    #[error("cannot write {kind} ACL: {source}")]
    Write {
        kind: AclKind,
        #[source]
        source: MetadataError,
    },
    /// The stored attribute value is not a POSIX ACL this crate understands.
    #[error("malformed {kind} ACL on '{}': {source}", path.display())]
    Malformed {
        path: PathBuf,
        kind: AclKind,
        #[source]
        source: AclDecodeError,
    },
    /// A qualifier would leave the id space; the ACL was left untouched.
    #[error("cannot rebase {kind} ACL on '{}': {source}", path.display())]
    OutOfRange {
        path: PathBuf,
        kind: AclKind,
        #[source]
        source: QualifierOutOfRange,
    },
}

impl AclError {
    /// Path whose ACL failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => source.path(),
            Self::Malformed { path, .. } | Self::OutOfRange { path, .. } => path,
        }
    }

    /// ACL being processed when the failure occurred.
    #[must_use]
    pub const fn kind(&self) -> AclKind {
        match self {
            Self::Read { kind, .. }
            | Self::Write { kind, .. }
            | Self::Malformed { kind, .. }
            | Self::OutOfRange { kind, .. } => *kind,
        }
    }
}

/// Number of ACLs rewritten for one path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AclRebaseOutcome {
    rewritten: u8,
}

impl AclRebaseOutcome {
    /// Outcome for a path that had `rewritten` ACLs written back.
    #[must_use]
    pub const fn with_rewritten(rewritten: u8) -> Self {
        Self { rewritten }
    }

    #[cfg_attr(not(all(feature = "acl", target_os = "linux")), allow(dead_code))]
    pub(crate) fn record_rewrite(&mut self) {
        self.rewritten += 1;
    }

    /// ACLs written back (0, 1, or 2 for a directory).
    #[must_use]
    pub const fn rewritten(&self) -> u8 {
        self.rewritten
    }

    /// Reports whether anything was written.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.rewritten != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn directories_rebase_default_before_access() {
        assert_eq!(
            AclKind::for_entry(true),
            &[AclKind::Default, AclKind::Access]
        );
        assert_eq!(AclKind::for_entry(false), &[AclKind::Access]);
    }

    #[test]
    fn error_reports_path_and_kind() {
        let read = AclError::Read {
            kind: AclKind::Default,
            source: MetadataError::new(
                "read ACL attribute",
                Path::new("/srv/d"),
                io::Error::other("bad"),
            ),
        };
        assert_eq!(read.path(), Path::new("/srv/d"));
        assert_eq!(read.kind(), AclKind::Default);
        assert!(read.to_string().starts_with("cannot read default ACL: "));

        let range = AclError::OutOfRange {
            path: PathBuf::from("/srv/f"),
            kind: AclKind::Access,
            source: PosixAcl::from_entries(vec![AclEntry::new(AclTag::User, 4, 3)])
                .shifted(-4)
                .expect_err("negative"),
        };
        assert_eq!(range.path(), Path::new("/srv/f"));
        assert!(range.to_string().contains("user qualifier 3 shifted by -4"));
    }
}
