//! Diagnostic logging to stderr.
//!
//! Stdout carries command output; everything from `tracing` goes to stderr
//! so it never mixes with exported records.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `promptlab=debug`.
pub const LOG_ENV: &str = "PROMPTLAB_LOG";

/// Level used when `PROMPTLAB_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "promptlab=debug,warn" } else { "warn" }
}

/// Build the filter from `PROMPTLAB_LOG`, falling back to the default level.
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
