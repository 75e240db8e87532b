//! Tracing setup: span macros per pipeline stage, one-off event helpers,
//! and a `tracing-subscriber` initializer for binaries.

pub mod events;
pub mod spans;

use tracing_subscriber::EnvFilter;

/// Install a global `tracing-subscriber` reading `RUST_LOG` (defaulting
/// to `info`), with JSON output so log aggregation can parse it.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
