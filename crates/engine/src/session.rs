//! One run from scan to rebase.

use crate::error::RebaseError;
use crate::ops::{FilesystemOps, MetadataOps};
use crate::options::RebaseOptions;
use crate::range::{Analysis, ShiftPlan, analyze};
use crate::rebase::RebaseProgress;
#[cfg(unix)]
use crate::rebase::rebase_tree;
#[cfg(unix)]
use crate::scan::scan_tree;
use crate::statistics::Statistics;
#[cfg(unix)]
use logging::trace_range;
use std::path::{Path, PathBuf};

/// Operator go-ahead for a shift whose ranges overlap.
pub trait Confirm {
    /// Returns `true` to proceed with `plan`.
    fn confirm(&mut self, plan: &ShiftPlan) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&ShiftPlan) -> bool,
{
    fn confirm(&mut self, plan: &ShiftPlan) -> bool {
        self(plan)
    }
}

/// How a run that did not fail ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The tree already starts at the requested base; nothing was done.
    AlreadyAtBase,
    /// The shift was approved but the run was a dry run.
    DryRun(ShiftPlan),
    /// The operator declined an overlapping shift.
    Declined(ShiftPlan),
    /// Every entry was rebased.
    Completed {
        plan: ShiftPlan,
        progress: RebaseProgress,
    },
}

/// A scanned tree waiting to be analysed and rebased.
#[derive(Debug)]
pub struct RebaseSession<O = FilesystemOps> {
    root: PathBuf,
    options: RebaseOptions,
    statistics: Statistics,
    ops: O,
}

#[cfg(unix)]
impl RebaseSession<FilesystemOps> {
    /// Scans `root` on the real filesystem.
    pub fn scan(root: impl Into<PathBuf>, options: RebaseOptions) -> Result<Self, RebaseError> {
        Self::scan_with(root, options, FilesystemOps)
    }
}

impl<O: MetadataOps> RebaseSession<O> {
    /// Scans `root` using `ops` for every metadata primitive.
    #[cfg(unix)]
    pub fn scan_with(
        root: impl Into<PathBuf>,
        options: RebaseOptions,
        mut ops: O,
    ) -> Result<Self, RebaseError> {
        let root = root.into();
        let statistics = scan_tree(&root, options.acls_enabled(), &mut ops)?;
        Ok(Self {
            root,
            options,
            statistics,
            ops,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn options(&self) -> &RebaseOptions {
        &self.options
    }

    #[must_use]
    pub const fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Runs the range analysis against the scanned statistics.
    pub fn analyze(&self) -> Result<Analysis, RebaseError> {
        analyze(&self.statistics, self.options.destination_base())
    }

    /// Reports whether `analysis` needs an operator go-ahead under the
    /// session's options.
    #[must_use]
    pub const fn needs_confirmation(&self, analysis: &Analysis) -> bool {
        analysis.is_overlapping() && !self.options.is_forced() && !self.options.is_dry_run()
    }

    /// Applies `plan` to the tree. ACLs are only touched when requested and
    /// the scan found one.
    #[cfg(unix)]
    pub fn rebase(&mut self, plan: &ShiftPlan) -> Result<RebaseProgress, RebaseError> {
        let rebase_acls = self.options.acls_enabled() && self.statistics.has_extended_acls();
        let progress = rebase_tree(&self.root, plan, rebase_acls, &mut self.ops)?;
        Ok(progress)
    }

    /// Analyses, asks `confirm` when needed, and rebases unless the run is a
    /// dry run.
    #[cfg(unix)]
    pub fn execute<C>(&mut self, confirm: &mut C) -> Result<RunOutcome, RebaseError>
    where
        C: Confirm + ?Sized,
    {
        let analysis = self.analyze()?;
        let plan = match analysis {
            Analysis::AlreadyAtBase => return Ok(RunOutcome::AlreadyAtBase),
            Analysis::Disjoint(plan) | Analysis::Overlapping(plan) => plan,
        };

        if self.needs_confirmation(&analysis) && !confirm.confirm(&plan) {
            trace_range!("overlapping shift declined");
            return Ok(RunOutcome::Declined(plan));
        }

        if self.options.is_dry_run() {
            return Ok(RunOutcome::DryRun(plan));
        }

        let progress = self.rebase(&plan)?;
        Ok(RunOutcome::Completed { plan, progress })
    }

    /// Releases the metadata backend.
    pub fn into_ops(self) -> O {
        self.ops
    }

    #[cfg(test)]
    pub(crate) fn with_statistics(
        root: impl Into<PathBuf>,
        options: RebaseOptions,
        statistics: Statistics,
        ops: O,
    ) -> Self {
        Self {
            root: root.into(),
            options,
            statistics,
            ops,
        }
    }
}
