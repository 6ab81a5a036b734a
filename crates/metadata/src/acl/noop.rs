//! ACL stubs for builds without the `acl` feature or outside Linux.
//!
//! No entry ever reports an ACL, so the rebase pass never asks for one to
//! be rewritten.

use super::{AclError, AclKind, AclRebaseOutcome, PosixAcl};
use crate::MetadataError;
use std::io;
use std::path::Path;

pub fn has_extended_acls(_path: &Path, _is_dir: bool) -> Result<bool, MetadataError> {
    Ok(false)
}

pub fn read_acl(_path: &Path, _kind: AclKind) -> Result<Option<PosixAcl>, AclError> {
    Ok(None)
}

pub fn write_acl(path: &Path, kind: AclKind, _acl: &PosixAcl) -> Result<(), AclError> {
    Err(AclError::Write {
        kind,
        source: MetadataError::new(
            "write ACL attribute",
            path,
            io::Error::new(
                io::ErrorKind::Unsupported,
                "ACLs are not supported by this build",
            ),
        ),
    })
}

pub fn rebase_acls(
    _path: &Path,
    _is_dir: bool,
    _difference: i64,
) -> Result<AclRebaseOutcome, AclError> {
    Ok(AclRebaseOutcome::default())
}
