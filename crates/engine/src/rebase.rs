//! The mutating pass.

#[cfg(unix)]
use crate::entry::tree_entries;
use crate::entry::{EntryKind, TreeEntry};
use crate::error::{AbortCause, RebaseAbort};
use crate::ops::MetadataOps;
use crate::range::ShiftPlan;
#[cfg(unix)]
use logging::info_rebase;
use logging::{trace_rebase, trace_skip};
use metadata::has_set_id_bits;
#[cfg(unix)]
use std::path::Path;
use walk::WalkError;

/// Work done by the rebase pass.
///
/// The traversal root is not counted as a directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebaseProgress {
    files: u64,
    directories: u64,
    symlinks: u64,
    skipped_hard_links: u64,
    acls_rewritten: u64,
}

impl RebaseProgress {
    /// File-like entries handled, including hard links left alone by the
    /// guard.
    #[must_use]
    pub const fn files(&self) -> u64 {
        self.files
    }

    #[must_use]
    pub const fn directories(&self) -> u64 {
        self.directories
    }

    #[must_use]
    pub const fn symlinks(&self) -> u64 {
        self.symlinks
    }

    /// Hard-linked entries whose ids already lay in the destination range.
    #[must_use]
    pub const fn skipped_hard_links(&self) -> u64 {
        self.skipped_hard_links
    }

    #[must_use]
    pub const fn acls_rewritten(&self) -> u64 {
        self.acls_rewritten
    }
}

/// Applies a [`ShiftPlan`] entry by entry, stopping at the first failure.
pub struct RebaseWalker<'a, O> {
    plan: &'a ShiftPlan,
    rebase_acls: bool,
    ops: O,
    progress: RebaseProgress,
}

impl<'a, O: MetadataOps> RebaseWalker<'a, O> {
    /// `rebase_acls` should only be set when ACL rebasing was requested and
    /// the scan found at least one extended ACL.
    pub fn new(plan: &'a ShiftPlan, rebase_acls: bool, ops: O) -> Self {
        Self {
            plan,
            rebase_acls,
            ops,
            progress: RebaseProgress::default(),
        }
    }

    #[must_use]
    pub const fn progress(&self) -> &RebaseProgress {
        &self.progress
    }

    /// Shifts the ownership (and ACLs) of one entry.
    pub fn apply(&mut self, entry: &TreeEntry) -> Result<(), RebaseAbort> {
        self.apply_inner(entry)
            .map_err(|cause| RebaseAbort::new(entry.path().to_path_buf(), self.progress, cause))
    }

    fn apply_inner(&mut self, entry: &TreeEntry) -> Result<(), AbortCause> {
        let path = entry.path();

        if entry.kind() == EntryKind::Symlink {
            let (uid, gid) = self.shifted_owner(entry)?;
            trace_rebase!("lchown {} to {}:{}", path.display(), uid, gid);
            self.ops
                .change_owner(path, uid, gid, false)
                .map_err(AbortCause::Mutation)?;
            self.progress.symlinks += 1;
            return Ok(());
        }

        let is_dir = entry.kind() == EntryKind::Directory;
        // The inode was handled through another name; its ACLs are already shifted too.
        if self.already_shifted(entry) {
            trace_skip!(
                "{} has {} links and is already owned by {}:{}",
                path.display(),
                entry.nlink(),
                entry.uid(),
                entry.gid()
            );
            self.progress.skipped_hard_links += 1;
            self.progress.files += 1;
            return Ok(());
        }

        let (uid, gid) = self.shifted_owner(entry)?;
        trace_rebase!("chown {} to {}:{}", path.display(), uid, gid);
        self.ops
            .change_owner(path, uid, gid, false)
            .map_err(AbortCause::Mutation)?;
        if has_set_id_bits(entry.mode()) {
            self.ops
                .restore_mode(path, entry.mode())
                .map_err(AbortCause::Mutation)?;
        }

        if is_dir {
            if !entry.is_root() {
                self.progress.directories += 1;
            }
        } else {
            self.progress.files += 1;
        }

        if self.rebase_acls {
            let outcome = self
                .ops
                .rebase_acls(path, is_dir, self.plan.difference())?;
            self.progress.acls_rewritten += u64::from(outcome.rewritten());
        }
        Ok(())
    }

    /// Hard-linked file whose uid or gid already lies in the destination
    /// range, presumably reached earlier through another name.
    fn already_shifted(&self, entry: &TreeEntry) -> bool {
        let destination = self.plan.destination();
        entry.is_hard_linked()
            && (destination.contains(entry.uid()) || destination.contains(entry.gid()))
    }

    fn shifted_owner(&self, entry: &TreeEntry) -> Result<(u32, u32), AbortCause> {
        match (self.plan.shift(entry.uid()), self.plan.shift(entry.gid())) {
            (Some(uid), Some(gid)) => Ok((uid, gid)),
            _ => Err(AbortCause::StaleOwnership {
                uid: entry.uid(),
                gid: entry.gid(),
            }),
        }
    }

    pub fn finish(self) -> RebaseProgress {
        self.progress
    }
}

/// Rebases an entry sequence, stopping at the first failure.
pub fn rebase_entries<I, O>(
    entries: I,
    plan: &ShiftPlan,
    rebase_acls: bool,
    ops: O,
) -> Result<RebaseProgress, RebaseAbort>
where
    I: IntoIterator<Item = Result<TreeEntry, WalkError>>,
    O: MetadataOps,
{
    let mut walker = RebaseWalker::new(plan, rebase_acls, ops);
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error.path().to_path_buf();
                return Err(RebaseAbort::new(
                    path,
                    *walker.progress(),
                    AbortCause::Traversal(error),
                ));
            }
        };
        walker.apply(&entry)?;
    }
    Ok(walker.finish())
}

/// Rebases every entry under `root`, the root included.
#[cfg(unix)]
pub fn rebase_tree<O: MetadataOps>(
    root: &Path,
    plan: &ShiftPlan,
    rebase_acls: bool,
    ops: O,
) -> Result<RebaseProgress, RebaseAbort> {
    let mut entries = tree_entries(root).map_err(|error| {
        RebaseAbort::new(
            root.to_path_buf(),
            RebaseProgress::default(),
            AbortCause::Traversal(error),
        )
    })?;
    let progress = rebase_entries(entries.by_ref(), plan, rebase_acls, ops)?;
    info_rebase!(
        "rebased {}: {} files, {} directories, {} symlinks, {} mount points skipped",
        root.display(),
        progress.files(),
        progress.directories(),
        progress.symlinks(),
        entries.skipped_mounts()
    );
    Ok(progress)
}
