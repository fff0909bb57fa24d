//! Tracing setup for binaries built on this crate.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; falls back to `default_filter` if unset or invalid.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=life=debug,life_server=debug life-server
/// ```
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
