//! Diagnostic logging setup for hosts embedding the core.
//!
//! The library only emits `tracing` events. A host that wants them printed
//! calls [`init`] once; output goes to stderr so it can never interleave with
//! payloads written to stdout.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable consulted for the filter directive.
pub const LOG_ENV: &str = "DOCTREE_LOG";

/// Build the filter from `DOCTREE_LOG`, falling back to `default_directive`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a stderr subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(default_directive: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(default_directive))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
