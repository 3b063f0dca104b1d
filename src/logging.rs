//! Logging configuration for askchart.
//!
//! Logs go to stderr so the JSON response on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

/// Initializes stderr logging with an env-filter (default level: info).
///
/// Respects `RUST_LOG` for per-module overrides.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
