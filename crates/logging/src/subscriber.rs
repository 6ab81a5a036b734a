//! crates/logging/src/subscriber.rs
//! Subscriber installation for the idshift binary and its tests.

use super::config::VerbosityConfig;
use std::io;
use tracing_subscriber::fmt::MakeWriter;

/// Installs a stderr subscriber filtered by `config`.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one stays active.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{VerbosityConfig, init_tracing};
///
/// init_tracing(&VerbosityConfig::from_verbose_level(1));
/// logging::trace_scan!("scanning {}", "/export/vol1");
/// ```
pub fn init_tracing(config: &VerbosityConfig) -> bool {
    init_tracing_with_writer(config, io::stderr)
}

/// Installs a subscriber that writes formatted events through `writer`.
pub fn init_tracing_with_writer<W>(config: &VerbosityConfig, writer: W) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(writer)
        .with_target(true)
        .without_time()
        .try_init()
        .is_ok()
}
