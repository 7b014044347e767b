//! Tracing setup for the command-line tool.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,hepta_cli=info";

/// Install the global subscriber. `RUST_LOG` overrides the default filter;
/// `verbose` raises this binary's own events to debug.
pub fn init_telemetry(verbose: bool) {
    let fallback = if verbose {
        "warn,hepta_cli=debug,hepta_ir=debug,hepta_runtime=debug"
    } else {
        DEFAULT_FILTER
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
