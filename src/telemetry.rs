//! Process-wide log setup for the binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,prosumer_engine=info,tower=warn,hyper=warn";

/// Installs the global subscriber.
///
/// Logs go to stderr so the report on stdout stays clean. `RUST_LOG`
/// overrides [`DEFAULT_FILTER`]; `RUST_LOG=prosumer_engine=debug` shows
/// one line per simulated tick.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
