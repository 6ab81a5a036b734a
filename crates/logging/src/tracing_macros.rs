//! One macro per [`crate::LogArea`], each pinned to its target and level.

/// Emit a directory traversal trace.
///
/// # Example
/// ```ignore
/// trace_walk!("entering directory {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_walk {
    ($($arg:tt)*) => {
        $crate::__tracing::trace!(target: "idshift::walk", $($arg)*);
    };
}

/// Emit a discovery pass trace.
///
/// # Example
/// ```ignore
/// trace_scan!("hard link detected at {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_scan {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "idshift::scan", $($arg)*);
    };
}

/// Emit a range analysis trace.
///
/// # Example
/// ```ignore
/// trace_range!("difference {}", difference);
/// ```
#[macro_export]
macro_rules! trace_range {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "idshift::range", $($arg)*);
    };
}

/// Emit a rebase pass trace.
///
/// # Example
/// ```ignore
/// trace_rebase!("chown {} -> {}:{}", path.display(), uid, gid);
/// ```
#[macro_export]
macro_rules! trace_rebase {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "idshift::rebase", $($arg)*);
    };
}

/// Emit a trace for an entry the idempotence guard left untouched.
///
/// # Example
/// ```ignore
/// trace_skip!("already shifted: {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_skip {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "idshift::rebase::skip", $($arg)*);
    };
}

/// Emit an ACL probe or rewrite trace.
///
/// # Example
/// ```ignore
/// trace_acl!("rewrote default ACL of {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_acl {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "idshift::acl", $($arg)*);
    };
}

/// Emit the closing summary of the discovery pass.
///
/// Shown from the first `-v`, unlike the per-entry `trace_scan!` lines.
#[macro_export]
macro_rules! info_scan {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "idshift::scan", $($arg)*);
    };
}

/// Emit the closing summary of the rebase pass.
#[macro_export]
macro_rules! info_rebase {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "idshift::rebase", $($arg)*);
    };
}
