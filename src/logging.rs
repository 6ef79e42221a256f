//! Logging setup for the CLI.

use std::io::stderr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directive applied when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "mlb_stats=debug"
    } else {
        "mlb_stats=info"
    }
}

/// Build the filter: `RUST_LOG` wins when present and valid.
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Logs go to stderr so `--json` output on
/// stdout stays clean. Calling this twice is harmless.
pub fn setup_logging(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::Layer::new()
                .with_writer(stderr)
                .with_target(false)
                .with_filter(env_filter(verbose)),
        )
        .try_init();
}
