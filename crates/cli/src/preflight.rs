//! Checks run before the tree is touched: tree root validation and an
//! ownership self-test.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{CliError, ProbeStep};

/// Name of the file created and chowned under the tree root by
/// [`probe_ownership_change`].
pub const PROBE_FILE_NAME: &str = "SHRDLU$#@!.tmp";

/// Resolves the tree root operand: it must be absolute, resolvable and a
/// directory. Symbolic links along the path are resolved.
pub(crate) fn resolve_tree_root(operand: &OsStr) -> Result<PathBuf, CliError> {
    let given = Path::new(operand);
    if !given.is_absolute() {
        return Err(CliError::RelativeTreeRoot);
    }

    let resolved = fs::canonicalize(given).map_err(|source| CliError::UnresolvableTreeRoot {
        path: given.to_path_buf(),
        source,
    })?;
    let metadata = fs::metadata(&resolved).map_err(|source| CliError::UnresolvableTreeRoot {
        path: resolved.clone(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(CliError::NotADirectory { path: resolved });
    }
    Ok(resolved)
}

/// Fails unless the effective user is root.
#[cfg(unix)]
pub(crate) fn ensure_privileged() -> Result<(), CliError> {
    if rustix::process::geteuid().is_root() {
        Ok(())
    } else {
        Err(CliError::NotPrivileged)
    }
}

#[cfg(not(unix))]
pub(crate) fn ensure_privileged() -> Result<(), CliError> {
    Err(CliError::NotPrivileged)
}

/// Creates [`PROBE_FILE_NAME`] under `root`, hands it to `0:0` through its
/// descriptor and removes it again.
#[cfg(unix)]
pub(crate) fn probe_ownership_change(root: &Path) -> Result<(), CliError> {
    use rustix::fs::{CWD, Gid, Mode, OFlags, Uid, fchown, openat};

    let path = root.join(PROBE_FILE_NAME);
    let probe_error = |step, source: io::Error| CliError::Probe {
        step,
        path: path.clone(),
        source,
    };

    let fd = openat(
        CWD,
        &path,
        OFlags::CREATE | OFlags::EXCL | OFlags::RDONLY | OFlags::CLOEXEC,
        Mode::RUSR,
    )
    .map_err(|errno| probe_error(ProbeStep::Create, errno.into()))?;

    if let Err(errno) = fchown(&fd, Some(Uid::ROOT), Some(Gid::ROOT)) {
        drop(fd);
        if let Err(error) = fs::remove_file(&path) {
            tracing::warn!("could not remove {}: {error}", path.display());
        }
        return Err(probe_error(ProbeStep::ChangeOwner, errno.into()));
    }

    fs::remove_file(&path).map_err(|error| probe_error(ProbeStep::Remove, error))?;
    drop(fd);
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn probe_ownership_change(_root: &Path) -> Result<(), CliError> {
    Err(CliError::NotPrivileged)
}
