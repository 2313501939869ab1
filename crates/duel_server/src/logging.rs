//! Logging system setup.
//!
//! Initializes the tracing-based logging used throughout the
//! coordinator. The level comes from the command line (or `RUST_LOG`),
//! the format from the configuration file.

use crate::config::{Args, LoggingSettings};
use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// Precedence for the filter: `RUST_LOG` environment variable, then the
/// `--debug` flag, then the configured base level.
pub fn setup_logging(args: &Args, settings: &LoggingSettings) -> Result<()> {
    let level = if args.debug {
        "debug"
    } else {
        settings.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let result = if settings.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(false))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}
