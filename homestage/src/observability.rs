//! Tracing bootstrap for processes embedding the pipeline.

use tracing_subscriber::EnvFilter;

/// Installs a global subscriber honoring `RUST_LOG`, defaulting to
/// `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
