#![deny(unsafe_code)]

//! # Overview
//!
//! `metadata` hosts the filesystem primitives the identity rebase relies on:
//! numeric ownership changes that never follow symbolic links, restoration of
//! permission bits after a privileged `chown`, and POSIX ACL handling.
//!
//! # Design
//!
//! - [`change_owner`] wraps `fchownat(2)` through `rustix`, optionally with
//!   `AT_SYMLINK_NOFOLLOW`.
//! - [`restore_mode`] reapplies the permission bits (setuid/setgid included).
//! - [`acl`] probes, decodes, shifts, and stores the kernel's
//!   `system.posix_acl_*` attribute values. Without the `acl` feature, or off
//!   Linux, no path reports an ACL.
//!
//! # Errors
//!
//! Primitive failures surface as [`MetadataError`], which records the failing
//! operation, the path, and the originating [`std::io::Error`]. ACL failures
//! are classified further by [`acl::AclError`].

pub mod acl;
mod error;
mod ownership;

pub use acl::{
    AclError, AclKind, AclRebaseOutcome, PosixAcl, has_extended_acls, rebase_acls,
};
pub use error::MetadataError;
pub use ownership::{SET_GID_BIT, SET_UID_BIT, change_owner, has_set_id_bits, restore_mode};
