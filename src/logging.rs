//! Tracing subscriber setup for the snapview binary.
//!
//! Library code only emits `tracing` events; the binary decides where they
//! go. Output goes to stderr so command output on stdout stays clean.
//!
//! ```text
//! SNAPVIEW_LOG=snapview::preview=debug snapview preview 1 2 3
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "SNAPVIEW_LOG";

/// Filter used when `SNAPVIEW_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
