//! Tracing setup for the `vikey` binary.
//!
//! Output goes to stderr so it never mixes with command output. Filtering
//! follows RUST_LOG:
//! - `RUST_LOG=debug` - decision tree outcomes
//! - `RUST_LOG=libvikey_core::record=trace` - every decoded record

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber. `verbose` raises the default level to debug.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}
