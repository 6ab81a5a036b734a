//! Command-line parsing.

use std::ffi::{OsStr, OsString};

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser};

use crate::error::CliError;

/// Largest accepted destination base, leaving room for a 16-bit id block.
pub const MAX_BASE: u32 = u32::MAX - 0xFC00;

/// Parsed command produced by [`parse_args`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedArgs {
    pub(crate) show_help: bool,
    pub(crate) show_version: bool,
    pub(crate) base: Option<OsString>,
    pub(crate) dry_run: bool,
    pub(crate) force: bool,
    pub(crate) posix_acls: bool,
    pub(crate) verbosity: u8,
    pub(crate) operands: Vec<OsString>,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new("idshift")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg_required_else_help(false)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("base")
                .long("base")
                .short('b')
                .value_name("BASE")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .short('n')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .short('f')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("posix-acls")
                .long("posix-acls")
                .short('p')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("operands")
                .value_name("TREEROOT")
                .num_args(0..)
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Append),
        )
}

/// Parses `arguments`, the program name included.
pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from("idshift"));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        base: matches.remove_one::<OsString>("base"),
        dry_run: matches.get_flag("dry-run"),
        force: matches.get_flag("force"),
        posix_acls: matches.get_flag("posix-acls"),
        verbosity: matches.get_count("verbose"),
        operands: matches
            .remove_many::<OsString>("operands")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}

/// Parses a destination base: plain decimal digits, at most [`MAX_BASE`].
///
/// Zero must be spelled `0`.
pub(crate) fn parse_base(value: &OsStr) -> Result<u32, CliError> {
    let invalid = || CliError::InvalidBase {
        value: value.to_string_lossy().into_owned(),
    };

    let text = value.to_str().ok_or_else(invalid)?;
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }

    let base: u32 = text.parse().map_err(|_| invalid())?;
    if base == 0 && text != "0" {
        return Err(invalid());
    }
    if base > MAX_BASE {
        return Err(invalid());
    }
    Ok(base)
}
