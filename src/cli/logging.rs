//! Diagnostic log sink for the CLI.
//!
//! Library code reports lookup misses, unparsable descriptors and the like
//! through `tracing`; the binary installs a stderr subscriber for them.

use std::{
    env,
    io::{self, IsTerminal},
};

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding an env-filter expression, e.g. `intl_tools=debug`.
pub const LOG_ENV: &str = "INTL_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Build the filter from `INTL_LOG`, falling back to `warn` (`debug` when verbose).
pub fn env_filter(verbose: bool) -> EnvFilter {
    env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let ansi = io::stderr().is_terminal() && env::var_os("NO_COLOR").is_none();
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .without_time()
        .try_init();
}
