//! Logging initialisation for the Armature runtime.
//!
//! Sets up a `tracing-subscriber` from the `logging` section of the merged
//! serve options. `RUST_LOG` takes precedence over the configured level when
//! set, and initialisation is idempotent — a second call is a no-op.

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Initialises logging from a [`LoggingConfig`].
///
/// Uses `try_init` internally so calling this after a subscriber is already
/// installed (e.g. by a test harness) is harmless.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = try_init(config);
}

/// Tries to initialise logging, returning an error when a global subscriber
/// is already set.
pub fn try_init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    match config.format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(fmt::layer().compact())
            .with(filter)
            .try_init(),
        LogFormat::Full => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().pretty())
            .with(filter)
            .try_init(),
    }
}
