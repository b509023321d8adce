//! Log output for the CLI
//!
//! Everything goes to stderr so stdout stays clean for tables and JSON.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
fn default_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "info,maintrack_infra=debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init(verbose: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(verbose)))?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
