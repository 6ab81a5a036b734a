#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` owns the diagnostic plumbing shared by every idshift crate. All
//! diagnostics are emitted through [`tracing`] using one target per subsystem
//! (`idshift::walk`, `idshift::scan`, `idshift::range`, `idshift::rebase`,
//! `idshift::acl`), so operators can raise the verbosity of a single pass
//! without drowning in output from the others.
//!
//! # Design
//!
//! - [`LogArea`] enumerates the subsystems and their tracing targets.
//! - [`VerbosityConfig`] maps the command-line `-v` count to a per-area
//!   [`LevelFilter`](tracing::level_filters::LevelFilter) and renders it as an
//!   [`EnvFilter`](tracing_subscriber::EnvFilter) directive string.
//! - [`init_tracing`] installs a stderr `fmt` subscriber. `RUST_LOG` takes
//!   precedence over the computed directives when it is set.
//! - The `trace_*!` macros wrap the standard tracing macros with the matching
//!   target and level so call sites stay short. `info_scan!` and
//!   `info_rebase!` carry the end-of-pass summaries at INFO.
//!
//! # Invariants
//!
//! - Initialisation never panics. A second call leaves the first subscriber in
//!   place and reports `false`.
//! - Human-readable run reports are not routed through this crate; they are
//!   rendered by the CLI onto the writers it was handed.
//!
//! # Examples
//!
//! ```
//! use logging::{LogArea, VerbosityConfig};
//! use tracing::level_filters::LevelFilter;
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! assert_eq!(config.level(LogArea::Rebase), LevelFilter::DEBUG);
//! assert!(config.directives().contains("idshift::rebase=debug"));
//! ```

mod config;
mod levels;
mod subscriber;
mod tracing_macros;

pub use config::VerbosityConfig;
pub use levels::LogArea;
pub use subscriber::{init_tracing, init_tracing_with_writer};

#[doc(hidden)]
pub use tracing as __tracing;
