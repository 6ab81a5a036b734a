use crate::entry::{EntryKind, TreeEntry};

/// Aggregate facts gathered by the scan pass.
///
/// The id bounds are inclusive and cover every observed entry, symlinks and
/// special files included. Once anything has been observed
/// `uid_min <= uid_max` and `gid_min <= gid_max` hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statistics {
    uid_min: u32,
    uid_max: u32,
    gid_min: u32,
    gid_max: u32,
    files: u64,
    specials: u64,
    directories: u64,
    symlinks: u64,
    max_depth: usize,
    hard_links: bool,
    extended_acls: bool,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Creates statistics with no observations.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            uid_min: u32::MAX,
            uid_max: 0,
            gid_min: u32::MAX,
            gid_max: 0,
            files: 0,
            specials: 0,
            directories: 0,
            symlinks: 0,
            max_depth: 0,
            hard_links: false,
            extended_acls: false,
        }
    }

    /// Creates statistics whose id bounds start at the root's ownership.
    #[must_use]
    pub const fn seeded(uid: u32, gid: u32) -> Self {
        let mut stats = Self::new();
        stats.uid_min = uid;
        stats.uid_max = uid;
        stats.gid_min = gid;
        stats.gid_max = gid;
        stats
    }

    /// Folds one entry's ownership, kind, link count and depth in.
    pub fn observe(&mut self, entry: &TreeEntry) {
        self.uid_min = self.uid_min.min(entry.uid());
        self.uid_max = self.uid_max.max(entry.uid());
        self.gid_min = self.gid_min.min(entry.gid());
        self.gid_max = self.gid_max.max(entry.gid());

        match entry.kind() {
            EntryKind::File => self.files += 1,
            EntryKind::Other => {
                self.files += 1;
                self.specials += 1;
            }
            EntryKind::Directory => self.directories += 1,
            EntryKind::Symlink => self.symlinks += 1,
        }
        if entry.is_hard_linked() {
            self.hard_links = true;
        }
        self.max_depth = self.max_depth.max(entry.depth());
    }

    /// Latches the "extended ACLs present" flag.
    pub fn mark_extended_acls(&mut self) {
        self.extended_acls = true;
    }

    /// Removes the traversal root from the directory count.
    pub fn discount_root_directory(&mut self) {
        self.directories = self.directories.saturating_sub(1);
    }

    #[must_use]
    pub const fn uid_min(&self) -> u32 {
        self.uid_min
    }

    #[must_use]
    pub const fn uid_max(&self) -> u32 {
        self.uid_max
    }

    #[must_use]
    pub const fn gid_min(&self) -> u32 {
        self.gid_min
    }

    #[must_use]
    pub const fn gid_max(&self) -> u32 {
        self.gid_max
    }

    /// Width of the observed uid range.
    #[must_use]
    pub const fn uid_spread(&self) -> u32 {
        self.uid_max.saturating_sub(self.uid_min)
    }

    /// Width of the observed gid range.
    #[must_use]
    pub const fn gid_spread(&self) -> u32 {
        self.gid_max.saturating_sub(self.gid_min)
    }

    /// Non-directory, non-symlink entries. Hard links are not deduplicated.
    #[must_use]
    pub const fn files(&self) -> u64 {
        self.files
    }

    /// FIFOs, sockets and device nodes, already included in [`Self::files`].
    #[must_use]
    pub const fn specials(&self) -> u64 {
        self.specials
    }

    #[must_use]
    pub const fn directories(&self) -> u64 {
        self.directories
    }

    #[must_use]
    pub const fn symlinks(&self) -> u64 {
        self.symlinks
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[must_use]
    pub const fn has_hard_links(&self) -> bool {
        self.hard_links
    }

    #[must_use]
    pub const fn has_extended_acls(&self) -> bool {
        self.extended_acls
    }
}
