//! The read-only discovery pass.

#[cfg(unix)]
use crate::entry::tree_entries;
use crate::entry::{EntryKind, TreeEntry};
use crate::error::ScanError;
use crate::ops::MetadataOps;
use crate::statistics::Statistics;
#[cfg(unix)]
use logging::info_scan;
use logging::trace_scan;
#[cfg(unix)]
use std::path::Path;
use walk::WalkError;

/// Accumulates [`Statistics`] one entry at a time.
pub struct TreeScanner<O> {
    ops: O,
    detect_acls: bool,
    stats: Statistics,
}

impl<O: MetadataOps> TreeScanner<O> {
    /// Starts from `seed`, normally [`Statistics::seeded`] with the root's
    /// ownership.
    pub fn new(seed: Statistics, detect_acls: bool, ops: O) -> Self {
        Self {
            ops,
            detect_acls,
            stats: seed,
        }
    }

    /// Folds `entry` into the statistics, probing it for ACLs while none has
    /// been found yet.
    pub fn observe(&mut self, entry: &TreeEntry) -> Result<(), ScanError> {
        self.stats.observe(entry);

        let probe = self.detect_acls
            && !self.stats.has_extended_acls()
            && entry.kind() != EntryKind::Symlink;
        if probe {
            let is_dir = entry.kind() == EntryKind::Directory;
            if self.ops.has_extended_acls(entry.path(), is_dir)? {
                trace_scan!("first extended ACL found on {}", entry.path().display());
                self.stats.mark_extended_acls();
            }
        }
        Ok(())
    }

    /// Returns the statistics collected so far.
    pub fn finish(self) -> Statistics {
        self.stats
    }
}

/// Scans an entry sequence. The root entry, if present, is counted like any
/// other directory; callers discount it.
pub fn scan_entries<I, O>(
    seed: Statistics,
    entries: I,
    detect_acls: bool,
    ops: O,
) -> Result<Statistics, ScanError>
where
    I: IntoIterator<Item = Result<TreeEntry, WalkError>>,
    O: MetadataOps,
{
    let mut scanner = TreeScanner::new(seed, detect_acls, ops);
    for entry in entries {
        let entry = entry?;
        trace_scan!("{:?} {}", entry.kind(), entry.path().display());
        scanner.observe(&entry)?;
    }
    Ok(scanner.finish())
}

/// Scans the tree under `root`, seeding the id bounds from the root itself
/// and leaving the root out of the directory count.
#[cfg(unix)]
pub fn scan_tree<O: MetadataOps>(
    root: &Path,
    detect_acls: bool,
    ops: O,
) -> Result<Statistics, ScanError> {
    let mut entries = tree_entries(root)?;
    let first = entries.next().transpose()?;

    let (seed, root_is_dir) = first.as_ref().map_or((Statistics::new(), false), |first| {
        (
            Statistics::seeded(first.uid(), first.gid()),
            first.kind() == EntryKind::Directory,
        )
    });

    let remaining = first.into_iter().map(Ok).chain(entries.by_ref());
    let mut stats = scan_entries(seed, remaining, detect_acls, ops)?;
    if root_is_dir {
        stats.discount_root_directory();
    }

    info_scan!(
        "scanned {}: {} files, {} directories, {} symlinks, {} mount points skipped",
        root.display(),
        stats.files(),
        stats.directories(),
        stats.symlinks(),
        entries.skipped_mounts()
    );
    Ok(stats)
}
