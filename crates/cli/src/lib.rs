#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front-end of `idshift`. It parses
//! `-b BASE [-n] [-f] [-p] [-v]... [--] TREEROOT`, validates the tree root,
//! runs an ownership self-test under it, and then drives an
//! [`engine::RebaseSession`] step by step, printing the report between steps.
//!
//! # Design
//!
//! The crate exposes [`run`] as the primary entry point. The function accepts
//! an iterator of arguments together with handles for standard output and
//! error and returns the process exit code. [`run_with_input`] additionally
//! takes the reader answers to the confirmation prompt come from, which keeps
//! the whole front-end testable without a terminal.
//!
//! # Invariants
//!
//! - `run` never panics; failures surface as non-zero exit codes.
//! - Nothing under the tree root is modified before the self-test, the scan
//!   and the range analysis have all passed, except the self-test's own probe
//!   file, which is removed again.
//!
//! # Errors
//!
//! Usage, precondition, scan and mutation failures exit with `1`. Shifts the
//! analysis refuses exit with `2`. A declined prompt, a dry run and a tree
//! already at the requested base exit with `0`.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(["idshift", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(!stdout.is_empty());
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::io::{self, BufRead, Write};

use engine::{Analysis, Confirm, FAILURE_EXIT_CODE, RebaseError, RebaseOptions, RebaseSession};
use logging::VerbosityConfig;

mod arguments;
mod error;
mod preflight;
mod prompt;
mod report;


pub use arguments::MAX_BASE;
pub use error::{CliError, ProbeStep};
pub use preflight::PROBE_FILE_NAME;
pub use prompt::{LinePrompt, PROMPT};

use arguments::{ParsedArgs, parse_args, parse_base};

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Converts a status returned by [`run`] into a process exit code.
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// Confirmation answers are read from the process's standard input.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let stdin = io::stdin();
    run_with_input(arguments, stdin.lock(), stdout, stderr)
}

/// Like [`run`], reading confirmation answers from `input`.
pub fn run_with_input<I, S, In, Out, Err>(
    arguments: I,
    input: In,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    In: BufRead,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, input, stdout, stderr),
        Err(error) => {
            let _ = write!(stderr, "{error}");
            let _ = stderr.write_all(report::USAGE.as_bytes());
            FAILURE_EXIT_CODE
        }
    }
}

fn execute<In, Out, Err>(parsed: ParsedArgs, input: In, stdout: &mut Out, stderr: &mut Err) -> i32
where
    In: BufRead,
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        return match stdout.write_all(report::USAGE.trim_start().as_bytes()) {
            Ok(()) => 0,
            Err(_) => FAILURE_EXIT_CODE,
        };
    }

    if parsed.show_version {
        return match writeln!(stdout, "idshift {}", env!("CARGO_PKG_VERSION")) {
            Ok(()) => 0,
            Err(_) => FAILURE_EXIT_CODE,
        };
    }

    logging::init_tracing(&VerbosityConfig::from_verbose_level(parsed.verbosity));

    match rebase(&parsed, input, stdout, stderr) {
        Ok(status) => status,
        Err(Failure::Cli(error)) => {
            let _ = report::error(stderr, &error);
            if error.wants_usage() {
                let _ = stderr.write_all(report::USAGE.as_bytes());
            }
            FAILURE_EXIT_CODE
        }
        Err(Failure::Rebase(error)) => {
            let _ = match &error {
                RebaseError::Scan(failure) => report::scan_failure(stderr, failure),
                RebaseError::Aborted(abort) => report::rebase_failure(stdout, stderr, abort),
                RebaseError::Unsupported(_) | RebaseError::Overflow(_) => {
                    report::error(stderr, &error)
                }
            };
            error.exit_code()
        }
        Err(Failure::Output(_)) => FAILURE_EXIT_CODE,
    }
}

enum Failure {
    Cli(CliError),
    Rebase(RebaseError),
    Output(io::Error),
}

impl From<CliError> for Failure {
    fn from(error: CliError) -> Self {
        Self::Cli(error)
    }
}

impl From<RebaseError> for Failure {
    fn from(error: RebaseError) -> Self {
        Self::Rebase(error)
    }
}

impl From<io::Error> for Failure {
    fn from(error: io::Error) -> Self {
        Self::Output(error)
    }
}

/// Validates the command, then scans, analyses, asks and rebases, reporting
/// after each step.
fn rebase<In, Out, Err>(
    parsed: &ParsedArgs,
    input: In,
    stdout: &mut Out,
    stderr: &mut Err,
) -> Result<i32, Failure>
where
    In: BufRead,
    Out: Write,
    Err: Write,
{
    let base = parse_base(parsed.base.as_deref().ok_or(CliError::MissingBase)?)?;
    report::offset(stdout, base)?;

    let [operand] = parsed.operands.as_slice() else {
        return Err(CliError::TreeRootCount.into());
    };
    let root = preflight::resolve_tree_root(operand)?;
    preflight::ensure_privileged()?;
    preflight::probe_ownership_change(&root)?;

    let options = RebaseOptions::new(base)
        .rebase_acls(parsed.posix_acls)
        .dry_run(parsed.dry_run)
        .force(parsed.force);
    let mut session = RebaseSession::scan(root, options)?;
    report::statistics(stdout, session.statistics())?;

    let analysis = session.analyze()?;
    let plan = match analysis {
        Analysis::AlreadyAtBase => {
            report::already_at_base(stdout)?;
            return Ok(0);
        }
        Analysis::Disjoint(plan) | Analysis::Overlapping(plan) => plan,
    };

    if analysis.is_overlapping() {
        report::overlap_warning(stdout)?;
        if session.needs_confirmation(&analysis) {
            let approved = LinePrompt::new(input, &mut *stdout).confirm(&plan);
            if !approved {
                report::declined(stdout)?;
                return Ok(0);
            }
        }
    }

    report::shift_summary(stdout, session.statistics(), &plan)?;
    if session.options().is_dry_run() {
        report::dry_run(stdout)?;
        return Ok(0);
    }

    stdout.flush()?;
    let progress = session.rebase(&plan)?;
    report::success(stdout, &progress)?;
    Ok(0)
}
