//! Process-wide logging setup.

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize process-wide tracing with [`DEFAULT_FILTER`].
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(DEFAULT_FILTER);
}

/// Tracing subscriber configuration (filters, formatting).
pub mod tracing;
