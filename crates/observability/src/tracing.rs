//! Tracing/logging initialization.
//!
//! Logs go to stderr as JSON lines; stdout carries the console report.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process, falling back to `default_filter`
/// when `RUST_LOG` is not usable.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
