//! Diagnostic logging setup.
//!
//! Recorder messages (the ones a user reads in the console) are data and
//! live in each result. This module only wires `tracing` for internal
//! diagnostics, written to stderr and filtered via `WARNSCOPE_LOG`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV: &str = "WARNSCOPE_LOG";

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let default = if verbose { "warnscope=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
