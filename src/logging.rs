//! Diagnostic logging setup
//!
//! Logs go to stderr so stdout stays reserved for the CSV report. The filter
//! is read from `RUST_LOG` and defaults to `warn`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Install the global tracing subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
