//! Log output for the binary.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so stdout carries only
/// command output and JSON replies. `RUST_LOG` takes precedence over the
/// default level.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "tabkeep=debug" } else { "tabkeep=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore the error from a second initialisation.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
