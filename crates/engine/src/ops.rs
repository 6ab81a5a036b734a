//! Filesystem operations the passes perform, behind a trait so the passes
//! can run against recorded fakes.

use metadata::{AclError, AclRebaseOutcome, MetadataError};
use std::path::Path;

/// Metadata primitives used by the scan and rebase passes.
pub trait MetadataOps {
    /// Reports whether `path` carries an access ACL, or a default ACL when it
    /// is a directory. Never follows symlinks.
    fn has_extended_acls(&mut self, path: &Path, is_dir: bool) -> Result<bool, MetadataError>;

    /// Changes numeric ownership. `follow_symlinks = false` changes a link
    /// itself.
    fn change_owner(
        &mut self,
        path: &Path,
        uid: u32,
        gid: u32,
        follow_symlinks: bool,
    ) -> Result<(), MetadataError>;

    /// Reapplies the permission bits of `mode`.
    fn restore_mode(&mut self, path: &Path, mode: u32) -> Result<(), MetadataError>;

    /// Shifts ACL qualifiers by `difference`.
    fn rebase_acls(
        &mut self,
        path: &Path,
        is_dir: bool,
        difference: i64,
    ) -> Result<AclRebaseOutcome, AclError>;
}

/// [`MetadataOps`] backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilesystemOps;

impl MetadataOps for FilesystemOps {
    fn has_extended_acls(&mut self, path: &Path, is_dir: bool) -> Result<bool, MetadataError> {
        metadata::has_extended_acls(path, is_dir)
    }

    fn change_owner(
        &mut self,
        path: &Path,
        uid: u32,
        gid: u32,
        follow_symlinks: bool,
    ) -> Result<(), MetadataError> {
        metadata::change_owner(path, uid, gid, follow_symlinks)
    }

    fn restore_mode(&mut self, path: &Path, mode: u32) -> Result<(), MetadataError> {
        metadata::restore_mode(path, mode)
    }

    fn rebase_acls(
        &mut self,
        path: &Path,
        is_dir: bool,
        difference: i64,
    ) -> Result<AclRebaseOutcome, AclError> {
        metadata::rebase_acls(path, is_dir, difference)
    }
}

impl<T: MetadataOps + ?Sized> MetadataOps for &mut T {
    fn has_extended_acls(&mut self, path: &Path, is_dir: bool) -> Result<bool, MetadataError> {
        (**self).has_extended_acls(path, is_dir)
    }

    fn change_owner(
        &mut self,
        path: &Path,
        uid: u32,
        gid: u32,
        follow_symlinks: bool,
    ) -> Result<(), MetadataError> {
        (**self).change_owner(path, uid, gid, follow_symlinks)
    }

    fn restore_mode(&mut self, path: &Path, mode: u32) -> Result<(), MetadataError> {
        (**self).restore_mode(path, mode)
    }

    fn rebase_acls(
        &mut self,
        path: &Path,
        is_dir: bool,
        difference: i64,
    ) -> Result<AclRebaseOutcome, AclError> {
        (**self).rebase_acls(path, is_dir, difference)
    }
}
