//! Logging init: `tracing` events to stderr, filtered by `RUST_LOG` or the verbosity flag.

use tracing_subscriber::EnvFilter;

/// Default filter: warnings only, or debug output from this crate with `--verbose`.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,url2epub=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `verbose`.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
