//! Per-invocation execution context.
//!
//! An [`ActionContext`] is constructed once per handler invocation and
//! bundles the collaborators a handler may use: the cache bound to the
//! invoking addon, the addon's merged cache options, and opaque per-call
//! metadata injected by the host.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::addon::Addon;
use crate::cache::Cache;

/// Addon-scoped cache configuration, merged shallowly (last write wins).
pub type CacheOptions = Map<String, Value>;

// ─── ActionContext ────────────────────────────────────────────────────────────

/// Collaborator bundle injected into every action handler call.
pub struct ActionContext {
    cache: Arc<dyn Cache>,
    cache_options: CacheOptions,
    meta: Value,
}

impl ActionContext {
    /// Creates a context with empty cache options and no metadata.
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self {
            cache,
            cache_options: CacheOptions::new(),
            meta: Value::Null,
        }
    }

    /// Creates a context for one invocation against `addon`, snapshotting
    /// the addon's default cache options.
    pub fn for_addon(addon: &Addon, cache: Arc<dyn Cache>) -> Self {
        Self {
            cache,
            cache_options: addon.default_cache_options().clone(),
            meta: Value::Null,
        }
    }

    /// Replaces the cache options snapshot.
    pub fn with_cache_options(mut self, options: CacheOptions) -> Self {
        self.cache_options = options;
        self
    }

    /// Attaches opaque host-injected metadata, passed through as-is.
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = meta;
        self
    }

    /// The cache bound to the invoking addon.
    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// The cache options snapshot taken at context construction.
    pub fn cache_options(&self) -> &CacheOptions {
        &self.cache_options
    }

    /// Raw host-injected metadata (`Value::Null` when none was attached).
    pub fn meta(&self) -> &Value {
        &self.meta
    }

    /// Deserialises the metadata into `T`.
    ///
    /// Returns `Err` when the metadata is missing required fields or has the
    /// wrong shape; use `#[serde(default)]` to make fields optional.
    pub fn meta_as<T>(&self) -> serde_json::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        T::deserialize(&self.meta)
    }
}

// =============================================================================
// Tests
// =============================================================================
