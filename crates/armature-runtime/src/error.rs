//! Runtime error types.

use std::path::PathBuf;

use armature_core::AddonError;
use thiserror::Error;

/// Errors that can occur while loading serve options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options could not be extracted from the merged sources.
    #[error("failed to parse options: {0}")]
    Parse(String),

    /// An explicitly requested options file does not exist.
    #[error("options file not found: {0}")]
    FileNotFound(PathBuf),
}

/// Errors that can occur during bootstrap.
///
/// Every variant is terminal for the whole process: an addon set must be
/// complete and internally consistent before anything is served.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// An external reference failed to resolve to a usable addon.
    #[error("failed to load addon from '{reference}': {reason}")]
    Load {
        /// The reference that failed.
        reference: String,
        /// Underlying load error.
        reason: String,
    },

    /// A resolved addon failed a setup-time gate (validation, version parse).
    #[error(transparent)]
    Addon(#[from] AddonError),

    /// Options loading failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The process start arguments were not valid JSON.
    #[error("invalid start arguments: {0}")]
    Args(String),

    /// The external serve entry point failed.
    #[error("server error: {0}")]
    Serve(String),
}

/// Result type for options loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;
