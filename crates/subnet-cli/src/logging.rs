//! Logging setup for the CLI
//!
//! Events go to stderr so they never mix with command output.
//! `RUST_LOG` wins over the built-in default level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// Defaults to `warn`, or `debug` when `verbose` is set. Calling this again
/// after a subscriber is installed is a no-op.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // Another subscriber (e.g. from a test harness) is fine
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_logging(false).is_ok());
        assert!(init_logging(true).is_ok());
    }
}
