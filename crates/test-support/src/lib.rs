//! Shared fixtures for idshift tests.
//!
//! Most ownership tests need `CAP_CHOWN`; they call [`running_as_root`] and
//! return early when the suite runs unprivileged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Reports whether the current process runs with effective uid 0.
#[must_use]
pub fn running_as_root() -> bool {
    rustix::process::geteuid().is_root()
}

/// A scratch directory holding a tree to scan or rebase.
///
/// Every helper takes a path relative to [`TreeFixture::root`] and returns
/// the absolute path it created.
pub struct TreeFixture {
    _temp: TempDir,
    root: PathBuf,
}

impl TreeFixture {
    /// Creates an empty `tree` directory inside a fresh temporary directory.
    pub fn new() -> io::Result<Self> {
        let temp = tempfile::tempdir()?;
        let root = temp.path().join("tree");
        fs::create_dir(&root)?;
        Ok(Self { _temp: temp, root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, relative: &str) -> io::Result<PathBuf> {
        let path = self.root.join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    pub fn file(&self, relative: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn symlink(&self, relative: &str, target: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = self.root.join(relative);
        std::os::unix::fs::symlink(target, &path)?;
        Ok(path)
    }

    pub fn hard_link(&self, relative: &str, existing: &str) -> io::Result<PathBuf> {
        let path = self.root.join(relative);
        fs::hard_link(self.root.join(existing), &path)?;
        Ok(path)
    }

    pub fn fifo(&self, relative: &str) -> io::Result<PathBuf> {
        let path = self.root.join(relative);
        rustix::fs::mknodat(
            rustix::fs::CWD,
            &path,
            rustix::fs::FileType::Fifo,
            rustix::fs::Mode::from_raw_mode(0o644),
            0,
        )?;
        Ok(path)
    }

    /// Sets the numeric owner of `relative` without following symlinks.
    /// An empty path names the root itself.
    pub fn chown(&self, relative: &str, uid: u32, gid: u32) -> io::Result<()> {
        let path = self.path(relative);
        std::os::unix::fs::lchown(&path, Some(uid), Some(gid))
    }

    #[must_use]
    pub fn path(&self, relative: &str) -> PathBuf {
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

/// A tmpfs mounted over a fixture directory, unmounted on drop.
///
/// Declare it after the [`TreeFixture`] it lives in so it is dropped first.
pub struct TmpfsMount {
    target: PathBuf,
}

impl TmpfsMount {
    /// Mounts a small tmpfs on `target` with `mount(8)`.
    ///
    /// Returns `None` when the host refuses the mount (no `CAP_SYS_ADMIN`,
    /// no `mount` binary); callers skip their test in that case.
    #[must_use]
    pub fn new(target: &Path) -> Option<Self> {
        let status = Command::new("mount")
            .args(["-t", "tmpfs", "-o", "size=1m", "idshift-test"])
            .arg(target)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .ok()?;
        status.success().then(|| Self {
            target: target.to_path_buf(),
        })
    }
}

impl Drop for TmpfsMount {
    fn drop(&mut self) {
        let _ = Command::new("umount")
            .arg(&self.target)
            .stderr(Stdio::null())
            .status();
    }
}

/// Reads the numeric owner of `path` without following symlinks.
pub fn owner_of(path: &Path) -> io::Result<(u32, u32)> {
    use std::os::unix::fs::MetadataExt;
    let metadata = fs::symlink_metadata(path)?;
    Ok((metadata.uid(), metadata.gid()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_builds_nested_entries() {
        let fixture = TreeFixture::new().expect("fixture");
        let file = fixture.file("a/b/c.txt", b"data").expect("file");
        assert!(file.starts_with(fixture.root()));
        assert_eq!(fs::read(&file).expect("read"), b"data");

        let link = fixture.symlink("a/link", "b/c.txt").expect("symlink");
        assert!(fs::symlink_metadata(&link).expect("lstat").file_type().is_symlink());

        let twin = fixture.hard_link("twin", "a/b/c.txt").expect("hard link");
        assert_eq!(fs::read(twin).expect("read"), b"data");
        assert_eq!(fixture.path(""), fixture.root());
    }

    #[test]
    fn owner_matches_effective_ids_for_new_files() {
        let fixture = TreeFixture::new().expect("fixture");
        let file = fixture.file("f", b"").expect("file");
        let (uid, _) = owner_of(&file).expect("owner");
        assert_eq!(uid, rustix::process::geteuid().as_raw());
    }
}
