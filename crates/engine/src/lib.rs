#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` implements the two passes of an identity rebase together with the
//! decision that separates them. A read-only scan collects the uid and gid
//! bounds of a tree, its entry counts, whether hard links exist and whether
//! any entry carries an extended POSIX ACL. The range analysis turns those
//! statistics and a destination base into a [`ShiftPlan`] or a refusal. The
//! rebase pass then applies the plan entry by entry.
//!
//! # Design
//!
//! - [`tree_entries`] adapts the physical walk from the `walk` crate into
//!   [`TreeEntry`] values, root first.
//! - [`TreeScanner`] folds entries into [`Statistics`].
//! - [`analyze`] checks the statistics and returns an [`Analysis`].
//! - [`RebaseWalker`] applies a plan and counts its work in
//!   [`RebaseProgress`].
//! - [`RebaseSession`] strings the steps together for one run and consults a
//!   [`Confirm`] implementation before an overlapping shift.
//! - Every filesystem mutation goes through [`MetadataOps`];
//!   [`FilesystemOps`] is the real backend.
//!
//! # Invariants
//!
//! - The scan never modifies the tree.
//! - A refused analysis happens before any mutation.
//! - The rebase stops at the first failing entry; entries already handled
//!   stay shifted.
//!
//! # Errors
//!
//! Every failure is a [`RebaseError`]; [`RebaseError::exit_code`] maps it onto
//! the process exit status.

mod entry;
mod error;
mod ops;
mod options;
mod range;
mod rebase;
mod scan;
mod session;
mod statistics;

#[cfg(test)]
mod testing;

pub use entry::{EntryKind, TreeEntry};
#[cfg(unix)]
pub use entry::{TreeEntries, tree_entries};
pub use error::{
    AbortCause, FAILURE_EXIT_CODE, RangeOverflow, RebaseAbort, RebaseError, ScanError,
    UNSUPPORTED_EXIT_CODE, UnsupportedReason,
};
pub use ops::{FilesystemOps, MetadataOps};
pub use options::RebaseOptions;
pub use range::{Analysis, IdKind, RangeSpec, ShiftPlan, analyze};
#[cfg(unix)]
pub use rebase::rebase_tree;
pub use rebase::{RebaseProgress, RebaseWalker, rebase_entries};
#[cfg(unix)]
pub use scan::scan_tree;
pub use scan::{TreeScanner, scan_entries};
pub use session::{Confirm, RebaseSession, RunOutcome};
pub use statistics::Statistics;
