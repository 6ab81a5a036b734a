//! Per-entry view of the tree shared by both passes.

use std::fs;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use walk::{WalkBuilder, WalkEntry, WalkError, Walker};

/// Classification of a visited filesystem object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A symbolic link. Never dereferenced.
    Symlink,
    /// A FIFO, socket, or device node.
    Other,
}

impl EntryKind {
    /// Classifies a file type obtained without following symlinks.
    #[must_use]
    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }

    /// Reports whether the entry is counted, probed and guarded as a file.
    ///
    /// Special files carry ownership, hard links and ACLs exactly like
    /// regular files do.
    #[must_use]
    pub const fn is_file_like(self) -> bool {
        matches!(self, Self::File | Self::Other)
    }
}

/// Ownership snapshot of a single visited entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    path: PathBuf,
    kind: EntryKind,
    uid: u32,
    gid: u32,
    mode: u32,
    nlink: u64,
    depth: usize,
    is_root: bool,
}

impl TreeEntry {
    /// Creates an entry owned by `0:0` with a single link at depth zero.
    ///
    /// Used to describe synthetic trees; real traversals go through
    /// [`TreeEntry::from_walk`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let mode = match kind {
            EntryKind::Directory => 0o040_755,
            EntryKind::Symlink => 0o120_777,
            EntryKind::File => 0o100_644,
            EntryKind::Other => 0o010_644,
        };
        Self {
            path: path.into(),
            kind,
            uid: 0,
            gid: 0,
            mode,
            nlink: 1,
            depth: 0,
            is_root: false,
        }
    }

    #[must_use]
    pub fn with_owner(mut self, uid: u32, gid: u32) -> Self {
        self.uid = uid;
        self.gid = gid;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_links(mut self, nlink: u64) -> Self {
        self.nlink = nlink;
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Marks the entry as the traversal root.
    #[must_use]
    pub fn as_root(mut self) -> Self {
        self.is_root = true;
        self.depth = 0;
        self
    }

    /// Builds an entry from a walker item.
    #[cfg(unix)]
    #[must_use]
    pub fn from_walk(entry: WalkEntry) -> Self {
        use std::os::unix::fs::MetadataExt;

        let depth = entry.depth();
        let is_root = entry.is_root();
        let (path, metadata) = entry.into_parts();
        Self {
            path,
            kind: EntryKind::from_file_type(metadata.file_type()),
            uid: metadata.uid(),
            gid: metadata.gid(),
            mode: metadata.mode(),
            nlink: metadata.nlink(),
            depth,
            is_root,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    #[must_use]
    pub const fn uid(&self) -> u32 {
        self.uid
    }

    #[must_use]
    pub const fn gid(&self) -> u32 {
        self.gid
    }

    /// Full `st_mode`, file type bits included.
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }

    #[must_use]
    pub const fn nlink(&self) -> u64 {
        self.nlink
    }

    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.is_root
    }

    /// Reports whether the entry is a file-like object with more than one
    /// name.
    #[must_use]
    pub const fn is_hard_linked(&self) -> bool {
        self.kind.is_file_like() && self.nlink > 1
    }
}

/// Entries of one tree in walk order, root first.
#[cfg(unix)]
#[derive(Debug)]
pub struct TreeEntries {
    walker: Walker,
}

#[cfg(unix)]
impl TreeEntries {
    /// Mount points left out so far, each with everything below it.
    #[must_use]
    pub const fn skipped_mounts(&self) -> u64 {
        self.walker.skipped_mounts()
    }
}

#[cfg(unix)]
impl Iterator for TreeEntries {
    type Item = Result<TreeEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.walker
            .next()
            .map(|entry| entry.map(TreeEntry::from_walk))
    }
}

/// Walks `root` physically without leaving its filesystem, root first.
#[cfg(unix)]
pub fn tree_entries(root: &Path) -> Result<TreeEntries, WalkError> {
    let walker = WalkBuilder::new(root)
        .include_root(true)
        .same_file_system(true)
        .build()?;
    Ok(TreeEntries { walker })
}
