//! Tracing subscriber setup.
//!
//! Logs go to stderr so they never mix with the diff on stdout. `RUST_LOG`
//! overrides the default filter.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

/// Installs the global fmt subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    INIT_ONCE.call_once(|| {
        let default = if verbose {
            "docmatch=debug"
        } else {
            "docmatch=warn"
        };
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
            )
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
