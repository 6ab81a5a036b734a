//! crates/logging/src/levels.rs
//! Diagnostic areas and their tracing targets.

use std::fmt;

/// Subsystem that emitted a diagnostic.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LogArea {
    /// Directory traversal (entering directories, skipped mounts).
    Walk,
    /// Read-only discovery pass.
    Scan,
    /// Range analysis and safety classification.
    Range,
    /// Mutating pass over ownership and modes.
    Rebase,
    /// ACL presence probes and qualifier rewrites.
    Acl,
}

impl LogArea {
    /// Every area, in the order used when rendering filter directives.
    pub const ALL: [Self; 5] = [Self::Walk, Self::Scan, Self::Range, Self::Rebase, Self::Acl];

    /// Returns the tracing target used by the area's macros.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Walk => "idshift::walk",
            Self::Scan => "idshift::scan",
            Self::Range => "idshift::range",
            Self::Rebase => "idshift::rebase",
            Self::Acl => "idshift::acl",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Walk => 0,
            Self::Scan => 1,
            Self::Range => 2,
            Self::Rebase => 3,
            Self::Acl => 4,
        }
    }
}

impl fmt::Display for LogArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}
