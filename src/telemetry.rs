//! Tracing setup for demos, binaries, and tests.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a formatted `tracing` subscriber.
///
/// Honors `RUST_LOG` when set, otherwise defaults to `info` globally and
/// `debug` for this crate. Safe to call more than once; only the first call
/// installs a subscriber.
pub fn init() {
    let fmt_layer = fmt::layer().with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,flowgraph=debug"))
        .unwrap_or_default();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
