//! Tracing subscriber setup
//!
//! Logs go to stderr so that stdout carries only the balances CSV. The filter
//! is read from `RUST_LOG` and defaults to `info`.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
