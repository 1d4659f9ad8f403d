//! Logging infrastructure for cellrow.
//!
//! Events go through `tracing` with target "cellrow" and carry an `event`
//! field for filtering. The crate never installs a global subscriber;
//! applications configure one via `tracing_subscriber` or similar.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: subsystem (e.g., "schema", "cursor")
//! - Use `%` for Display, `?` for Debug formatting
//! - Per-row events stay at debug level

/// Target for all cellrow log events.
pub(crate) const CELLROW_TARGET: &str = "cellrow";

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "cursor",
///     event = "row_skipped",
///     row = ?row,
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::CELLROW_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::CELLROW_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_warn;
