//! Human-readable run report.
//!
//! Progress and results go to standard output; failures go to standard error
//! prefixed with `Error: `.

use std::fmt::Display;
use std::io::{self, Write};

use engine::{RebaseAbort, RebaseProgress, ScanError, ShiftPlan, Statistics};

pub(crate) fn offset<W: Write>(out: &mut W, base: u32) -> io::Result<()> {
    writeln!(out, "Offset value: {base}.")
}

/// Scan summary.
pub(crate) fn statistics<W: Write>(out: &mut W, stats: &Statistics) -> io::Result<()> {
    writeln!(
        out,
        "Min uid: {}, Max uid: {}, Difference: {}",
        stats.uid_min(),
        stats.uid_max(),
        stats.uid_spread()
    )?;
    writeln!(
        out,
        "Min gid: {}, Max gid: {}, Difference: {}",
        stats.gid_min(),
        stats.gid_max(),
        stats.gid_spread()
    )?;
    writeln!(
        out,
        "Number of files (not traversing submounts and not counting symlinks): {}",
        stats.files()
    )?;
    if stats.specials() > 0 {
        writeln!(out, "  of which special files: {}", stats.specials())?;
    }
    writeln!(out, "Number of directories: {}", stats.directories())?;
    writeln!(out, "Number of symlinks: {}", stats.symlinks())?;
    writeln!(out, "Max depth reached: {}", stats.max_depth())?;
    writeln!(out, "Hardlinks present: {}", yes_no(stats.has_hard_links()))?;
    writeln!(out, "POSIX acl present: {}", yes_no(stats.has_extended_acls()))
}

pub(crate) fn already_at_base<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "No action necessary, base uid already equal to requested base."
    )
}

pub(crate) fn overlap_warning<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "WARNING: The destination range and origin range of uids are overlapping."
    )
}

pub(crate) fn declined<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Exiting.")
}

/// Highest uid and gid once `plan` is applied.
pub(crate) fn shift_summary<W: Write>(
    out: &mut W,
    stats: &Statistics,
    plan: &ShiftPlan,
) -> io::Result<()> {
    writeln!(
        out,
        "Max uid after shift: {}",
        shifted_or_raw(plan, stats.uid_max())
    )?;
    writeln!(
        out,
        "Max gid after shift: {}",
        shifted_or_raw(plan, stats.gid_max())
    )
}

pub(crate) fn dry_run<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Dry-run requested, the program ends.")
}

pub(crate) fn success<W: Write>(out: &mut W, progress: &RebaseProgress) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "SUCCESS")?;
    writeln!(out, "Number of files done: {}", progress.files())?;
    writeln!(out, "Number of dirs done: {}", progress.directories())?;
    writeln!(out, "Number of symlinks done: {}", progress.symlinks())?;
    if progress.skipped_hard_links() > 0 {
        writeln!(
            out,
            "Hard-linked files already shifted: {}",
            progress.skipped_hard_links()
        )?;
    }
    if progress.acls_rewritten() > 0 {
        writeln!(out, "ACLs rewritten: {}", progress.acls_rewritten())?;
    }
    Ok(())
}

pub(crate) fn error<W: Write>(err: &mut W, message: impl Display) -> io::Result<()> {
    writeln!(err, "Error: {message}")
}

pub(crate) fn scan_failure<W: Write>(err: &mut W, failure: &ScanError) -> io::Result<()> {
    writeln!(err, "Error: During scan at path <{}>", failure.path().display())?;
    error(err, failure.io_error())
}

/// Where the rebase stopped and how far it got. Entries already handled keep
/// their new ownership.
pub(crate) fn rebase_failure<O: Write, E: Write>(
    out: &mut O,
    err: &mut E,
    abort: &RebaseAbort,
) -> io::Result<()> {
    writeln!(err, "Error: During rebase at path <{}>", abort.path().display())?;
    writeln!(out)?;
    writeln!(out, "Number of files done: {}", abort.progress().files())?;
    error(err, abort.cause())
}

pub(crate) const USAGE: &str = concat!(
    "\n",
    "Usage: idshift -b BASE [-n] [-f] [-p] [-v]... [--] TREEROOT\n",
    "  -b, --base BASE    new base uid for the tree rooted at TREEROOT\n",
    "  -n, --dry-run      only run the preliminary checks and print statistics\n",
    "  -f, --force        do not ask before an overlapping shift\n",
    "  -p, --posix-acls   shift POSIX ACL qualifier ids as well\n",
    "  -v, --verbose      increase diagnostic output (repeatable)\n",
    "  -h, --help         show this help and exit\n",
    "  -V, --version      show the version and exit\n",
    "  TREEROOT           absolute path of the directory to rebase\n",
    "\n",
    "CAUTION: The filesystem under TREEROOT must not be accessed while this program runs.\n",
);

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn shifted_or_raw(plan: &ShiftPlan, id: u32) -> u64 {
    plan.shift(id).map_or(u64::from(id), u64::from)
}
