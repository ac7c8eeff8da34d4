//! Pieces shared by the `medibot` server and the `store_index` job.

pub mod indexing;

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber both binaries log through: stderr, `RUST_LOG`
/// filtering with `info` as the default. A second call is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
