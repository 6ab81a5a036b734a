#![allow(unsafe_code)]

//! Ownership and mode primitives used by the rebase pass.

use crate::error::MetadataError;
#[cfg(unix)]
use std::fs;
use std::io;
use std::path::Path;

#[cfg(unix)]
use rustix::fs::{AtFlags, CWD, chownat};

/// Set-user-ID bit.
pub const SET_UID_BIT: u32 = 0o4000;
/// Set-group-ID bit.
pub const SET_GID_BIT: u32 = 0o2000;

#[cfg(unix)]
#[allow(unused_unsafe)]
pub(crate) fn uid_from_raw(raw: rustix::process::RawUid) -> rustix::fs::Uid {
    unsafe { rustix::fs::Uid::from_raw(raw) }
}

#[cfg(unix)]
#[allow(unused_unsafe)]
pub(crate) fn gid_from_raw(raw: rustix::process::RawGid) -> rustix::fs::Gid {
    unsafe { rustix::fs::Gid::from_raw(raw) }
}

/// Reports whether `mode` carries the setuid or setgid bit.
///
/// A privileged ownership change may silently clear both bits, so callers
/// reapply the original mode whenever this returns `true`.
#[must_use]
pub const fn has_set_id_bits(mode: u32) -> bool {
    mode & (SET_UID_BIT | SET_GID_BIT) != 0
}

/// Changes the numeric owner and group of `path`.
///
/// With `follow_symlinks` disabled the link itself is changed (`lchown`
/// semantics) and its target is never touched.
#[cfg(unix)]
pub fn change_owner(
    path: &Path,
    uid: u32,
    gid: u32,
    follow_symlinks: bool,
) -> Result<(), MetadataError> {
    let flags = if follow_symlinks {
        AtFlags::empty()
    } else {
        AtFlags::SYMLINK_NOFOLLOW
    };

    chownat(
        CWD,
        path,
        Some(uid_from_raw(uid)),
        Some(gid_from_raw(gid)),
        flags,
    )
    .map_err(|error| MetadataError::new("change ownership", path, io::Error::from(error)))
}

/// Ownership changes are not available on this platform.
#[cfg(not(unix))]
pub fn change_owner(
    path: &Path,
    _uid: u32,
    _gid: u32,
    _follow_symlinks: bool,
) -> Result<(), MetadataError> {
    Err(MetadataError::new(
        "change ownership",
        path,
        io::Error::new(
            io::ErrorKind::Unsupported,
            "changing ownership is not supported on this platform",
        ),
    ))
}

/// Writes the permission bits of `mode` (including setuid, setgid and sticky)
/// back to `path`.
#[cfg(unix)]
pub fn restore_mode(path: &Path, mode: u32) -> Result<(), MetadataError> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = fs::Permissions::from_mode(mode & 0o7777);
    fs::set_permissions(path, permissions)
        .map_err(|error| MetadataError::new("restore mode", path, error))
}

/// Mode bits are not available on this platform.
#[cfg(not(unix))]
pub fn restore_mode(path: &Path, _mode: u32) -> Result<(), MetadataError> {
    Err(MetadataError::new(
        "restore mode",
        path,
        io::Error::new(
            io::ErrorKind::Unsupported,
            "permission bits are not supported on this platform",
        ),
    ))
}
