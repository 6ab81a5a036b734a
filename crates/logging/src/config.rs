//! crates/logging/src/config.rs
//! Verbosity configuration mapping `-v` counts to per-area levels.

use super::levels::LogArea;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Per-area verbosity levels.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerbosityConfig {
    levels: [LevelFilter; LogArea::ALL.len()],
    default: LevelFilter,
}

impl Default for VerbosityConfig {
    fn default() -> Self {
        Self::from_verbose_level(0)
    }
}

impl VerbosityConfig {
    /// Creates a configuration from a verbose level (number of `-v` flags).
    ///
    /// - `0`: warnings and errors only.
    /// - `1`: pass summaries, the range analysis and hard-linked files left
    ///   alone by the rebase guard.
    /// - `2`: every scanned entry, ownership change and ACL probe or rewrite.
    /// - `3` and above: everything, including directory traversal.
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self {
            levels: [LevelFilter::WARN; LogArea::ALL.len()],
            default: LevelFilter::WARN,
        };

        match level {
            0 => {}
            1 => {
                config.set(LogArea::Scan, LevelFilter::INFO);
                config.set(LogArea::Range, LevelFilter::INFO);
                config.set(LogArea::Rebase, LevelFilter::INFO);
                config.set(LogArea::Acl, LevelFilter::INFO);
            }
            2 => {
                config.set(LogArea::Walk, LevelFilter::INFO);
                config.set(LogArea::Scan, LevelFilter::DEBUG);
                config.set(LogArea::Range, LevelFilter::DEBUG);
                config.set(LogArea::Rebase, LevelFilter::DEBUG);
                config.set(LogArea::Acl, LevelFilter::DEBUG);
            }
            _ => {
                config.levels = [LevelFilter::TRACE; LogArea::ALL.len()];
                config.default = LevelFilter::INFO;
            }
        }

        config
    }

    /// Overrides the level for a single area.
    pub fn set(&mut self, area: LogArea, level: LevelFilter) {
        self.levels[area.index()] = level;
    }

    /// Returns the level configured for `area`.
    #[must_use]
    pub const fn level(&self, area: LogArea) -> LevelFilter {
        self.levels[area.index()]
    }

    /// Renders the configuration as an [`EnvFilter`] directive string.
    #[must_use]
    pub fn directives(&self) -> String {
        let mut rendered = level_name(self.default).to_owned();
        for area in LogArea::ALL {
            rendered.push(',');
            rendered.push_str(area.target());
            rendered.push('=');
            rendered.push_str(level_name(self.level(area)));
        }
        rendered
    }

    /// Builds the filter, letting `RUST_LOG` win when it is set and valid.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directives()))
    }
}

fn level_name(level: LevelFilter) -> &'static str {
    if level == LevelFilter::OFF {
        "off"
    } else if level == LevelFilter::ERROR {
        "error"
    } else if level == LevelFilter::WARN {
        "warn"
    } else if level == LevelFilter::INFO {
        "info"
    } else if level == LevelFilter::DEBUG {
        "debug"
    } else {
        "trace"
    }
}
