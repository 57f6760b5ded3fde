//! Tracing setup shared by both binaries
//!
//! Diagnostics go to stderr so they never mix with result lines on stdout.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Console log level for the given `--debug` flag
pub fn log_level(debug: bool) -> Level {
    if debug { Level::DEBUG } else { Level::WARN }
}

/// Initializes the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the level selected by `debug`. Calling
/// this more than once is harmless; later calls leave the first subscriber
/// in place.
pub fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(debug).to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
