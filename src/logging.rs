//! Diagnostic logging.
//!
//! Diagnostics go to stderr through `tracing`, filtered by the
//! `SHECRETS_LOG` environment variable (e.g. `SHECRETS_LOG=debug`).
//! They are quiet by default so they never mix with command output.
//! No event carries plaintext secrets or key material.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "SHECRETS_LOG";

/// Filter used when `SHECRETS_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Install the global stderr subscriber.  Safe to call more than once.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
