//! Tracing subscriber setup for the sweep binaries.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber once per process.
///
/// `RUST_LOG` takes precedence over `default_level`. Later calls are no-ops.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
