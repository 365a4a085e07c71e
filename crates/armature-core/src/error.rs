//! Unified error types for the Armature core.
//!
//! Runtime-level errors (bootstrap, configuration) are defined in
//! `armature-runtime`.

use thiserror::Error;

// =============================================================================
// Cache Errors
// =============================================================================

/// Errors raised by a [`Cache`](crate::cache::Cache) backend.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The backend rejected or failed the operation.
    #[error("cache backend error: {0}")]
    Backend(String),
}

impl CacheError {
    /// Creates a backend error from any displayable cause.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

// =============================================================================
// Addon Errors
// =============================================================================

/// Errors raised by addon registries, descriptors, and action dispatch.
#[derive(Debug, Error)]
pub enum AddonError {
    /// Dispatch requested an action name absent from the registry.
    ///
    /// Recoverable by the host: surfaced as an unsupported-action response,
    /// distinct from a handler that ran and failed.
    #[error("no handler registered for action '{action}'")]
    HandlerNotFound {
        /// The requested action name.
        action: String,
    },

    /// An addon's version string does not parse as a semantic version.
    #[error("addon '{id}' declares malformed version '{version}': {reason}")]
    VersionParse {
        /// The addon whose version failed to parse.
        id: String,
        /// The offending version string.
        version: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Addon props failed structural validation.
    #[error("addon props validation failed: {0}")]
    Validation(String),

    /// The self-test round-trip did not return the expected sentinel.
    ///
    /// Signals broken cache wiring; surfaced as a failed self-test rather
    /// than crashing the serving process.
    #[error("cache round-trip failed for key '{key}': expected '{expected}', got {got:?}")]
    CacheIntegrity {
        /// Key used for the round-trip.
        key: String,
        /// The sentinel that was stored.
        expected: String,
        /// What the cache returned on read-back, if anything.
        got: Option<String>,
    },

    /// A cache operation failed before the round-trip could be judged.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A domain action handler failed.
    #[error("action handler error: {0}")]
    Action(String),
}

impl AddonError {
    /// Creates a handler-not-found error.
    pub fn handler_not_found(action: impl Into<String>) -> Self {
        Self::HandlerNotFound {
            action: action.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a domain action failure from any displayable cause.
    pub fn action(msg: impl Into<String>) -> Self {
        Self::Action(msg.into())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Result type for addon operations.
pub type AddonResult<T> = Result<T, AddonError>;
