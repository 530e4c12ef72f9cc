//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Compact console output filtered via `RUST_LOG` (default `info`). Safe to
/// call multiple times (subsequent calls are no-ops). The shell is an
/// interactive client, so logs stay human-readable rather than structured
/// for shipping.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .try_init();
}
