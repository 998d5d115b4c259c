//! Logging bootstrap for the quotation tools.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Initializes logging once at startup.
///
/// The level comes from the `RUST_LOG` environment variable when set,
/// otherwise from `level` (the configured default). Output is colored only
/// when attached to a terminal. Calling this twice is harmless.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(io::stdout().is_terminal())
        .with_target(false)
        .compact()
        .try_init();
}
