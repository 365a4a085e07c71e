//! Addon descriptor: identity, versioned configuration, and built-in actions.
//!
//! An [`Addon`] is a plain record plus a separately owned, mutable
//! [`ActionRegistry`]. Construction always pre-populates the registry with
//! the two built-in actions; they are removable like any other entry, at the
//! caller's own risk of breaking host expectations.
//!
//! Composition is part of the same record: every addon carries an ordered
//! (usually empty) child list. A composite is just an addon whose children
//! are discovered and served as independent addons by the host — the
//! parent's registry never forwards to a child's.
//!
//! # Lifecycle
//!
//! The descriptor is built once from a fixed props value and lives for the
//! host process. Registration-phase setters take `&mut self`; once the addon
//! is shared behind an `Arc` for serving, the registry is read-only.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::context::{ActionContext, CacheOptions};
use crate::error::{AddonError, AddonResult};
use crate::registry::{ActionHandler, ActionRegistry, handler};
use crate::validate::{BasicPropsValidator, PropsValidator};

// ─── API versioning ───────────────────────────────────────────────────────────

/// Major version of the addon API this host supports.
///
/// Hosts compare an addon's [`major_version`](Addon::major_version) against
/// this before any handler is invoked — a coarse, fail-fast compatibility
/// gate rather than fine-grained capability negotiation.
pub const ADDON_API_MAJOR: u64 = 1;

/// Sentinel value stored and read back by the built-in `selftest` action.
const SELFTEST_SENTINEL: &str = "1";

/// Data-expiry bound for the selftest sentinel (not an execution timeout).
const SELFTEST_TTL: Duration = Duration::from_millis(60_000);

// ─── AddonType ────────────────────────────────────────────────────────────────

/// Behavioural category of an addon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddonType {
    /// Groups child addons for discovery.
    Repository,
    /// Executes background task actions.
    Worker,
    /// Serves catalog/content actions.
    ContentSource,
}

impl AddonType {
    /// Returns the wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::Worker => "worker",
            Self::ContentSource => "content-source",
        }
    }
}

impl fmt::Display for AddonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddonType {
    type Err = AddonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repository" => Ok(Self::Repository),
            "worker" => Ok(Self::Worker),
            "content-source" => Ok(Self::ContentSource),
            other => Err(AddonError::validation(format!(
                "unknown addon type '{other}'"
            ))),
        }
    }
}

// ─── Addon ────────────────────────────────────────────────────────────────────

/// Identity fields every props object must carry.
#[derive(Deserialize)]
struct Identity {
    id: String,
    #[serde(rename = "type")]
    kind: AddonType,
    version: String,
}

/// A named, versioned unit exposing a registry of invokable actions.
///
/// # Example
///
/// ```rust,ignore
/// use armature_core::prelude::*;
///
/// let mut addon = Addon::new(serde_json::json!({
///     "id": "demo-worker",
///     "type": "worker",
///     "version": "1.0.0",
/// }))?;
/// addon
///     .register_handler("echo", handler(|input, _ctx| async move { Ok(input) }))
///     .set_default_cache_options([("ttl".into(), 300.into())].into_iter().collect());
/// ```
pub struct Addon {
    id: String,
    kind: AddonType,
    version: String,
    /// Canonical props value; exclusively owned, readers get deep copies.
    props: Value,
    default_cache_options: CacheOptions,
    registry: ActionRegistry,
    validator: Arc<dyn PropsValidator>,
    children: Vec<Arc<Addon>>,
}

impl Addon {
    /// Builds a descriptor from a fixed props value.
    ///
    /// The props object must carry `id`, `type`, and `version`; those become
    /// the addon's immutable identity. The registry starts with the two
    /// built-in actions `selftest` and `addon`.
    ///
    /// # Errors
    ///
    /// [`AddonError::Validation`] when the identity fields are missing or
    /// malformed.
    pub fn new(props: Value) -> AddonResult<Self> {
        let identity = Identity::deserialize(&props)
            .map_err(|e| AddonError::validation(format!("invalid addon identity: {e}")))?;

        let mut addon = Self {
            id: identity.id,
            kind: identity.kind,
            version: identity.version,
            props,
            default_cache_options: CacheOptions::new(),
            registry: ActionRegistry::new(),
            validator: Arc::new(BasicPropsValidator),
            children: Vec::new(),
        };
        addon.register_handler("selftest", selftest_handler());
        addon.register_handler("addon", introspect_handler(addon.props.clone()));
        Ok(addon)
    }

    /// Builds a descriptor with a minimal props object for the given identity.
    pub fn with_identity(
        id: impl Into<String>,
        kind: AddonType,
        version: impl Into<String>,
    ) -> AddonResult<Self> {
        Self::new(json!({
            "id": id.into(),
            "type": kind.as_str(),
            "version": version.into(),
        }))
    }

    // ─── Identity accessors ──────────────────────────────────────────────

    /// Globally unique addon identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Behavioural category.
    pub fn kind(&self) -> AddonType {
        self.kind
    }

    /// Declared semantic-version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Deep copy of the declared props.
    ///
    /// Every call produces an independent copy — mutating the returned value
    /// never affects the addon or any other caller's copy.
    pub fn props(&self) -> Value {
        self.props.clone()
    }

    /// Parses the version string and returns its major component.
    ///
    /// # Errors
    ///
    /// [`AddonError::VersionParse`] (carrying the addon id and the offending
    /// string) when the version is not valid semver.
    pub fn major_version(&self) -> AddonResult<u64> {
        match semver::Version::parse(&self.version) {
            Ok(v) => Ok(v.major),
            Err(e) => Err(AddonError::VersionParse {
                id: self.id.clone(),
                version: self.version.clone(),
                reason: e.to_string(),
            }),
        }
    }

    // ─── Cache options ───────────────────────────────────────────────────

    /// Shallow-merges `options` into the addon-scoped cache defaults.
    ///
    /// Keys in `options` overwrite existing keys; unspecified keys are
    /// preserved.
    pub fn set_default_cache_options(&mut self, options: CacheOptions) -> &mut Self {
        for (key, value) in options {
            self.default_cache_options.insert(key, value);
        }
        self
    }

    /// Read-only view of the current merged cache defaults.
    pub fn default_cache_options(&self) -> &CacheOptions {
        &self.default_cache_options
    }

    // ─── Registry ────────────────────────────────────────────────────────

    /// Registers (or replaces) the handler for `action`.
    pub fn register_handler(&mut self, action: impl Into<String>, handler: ActionHandler) -> &mut Self {
        self.registry.register(action, handler);
        self
    }

    /// Removes the handler for `action`. No-op when absent.
    ///
    /// The built-ins may be unregistered too; keeping host expectations
    /// intact is then the caller's responsibility.
    pub fn unregister_handler(&mut self, action: &str) -> &mut Self {
        self.registry.unregister(action);
        self
    }

    /// Returns `true` when a handler is registered for `action`.
    pub fn has_handler(&self, action: &str) -> bool {
        self.registry.has(action)
    }

    /// Returns the handler for `action`, or
    /// [`AddonError::HandlerNotFound`].
    pub fn handler(&self, action: &str) -> AddonResult<ActionHandler> {
        self.registry.get(action)
    }

    /// The addon's action registry.
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Looks up `action` and invokes it with `input` and `ctx`.
    ///
    /// Within one dispatch the sequence is strictly ordered: lookup, then
    /// handler invocation, then result. An unknown action surfaces as
    /// [`AddonError::HandlerNotFound`] before the handler stage is reached.
    pub async fn dispatch(
        &self,
        action: &str,
        input: Value,
        ctx: Arc<ActionContext>,
    ) -> AddonResult<Value> {
        let handler = self.handler(action)?;
        debug!(addon = %self.id, action, "Dispatching action");
        handler(input, ctx).await
    }

    // ─── Validation ──────────────────────────────────────────────────────

    /// Replaces the props validator collaborator.
    pub fn set_validator(&mut self, validator: Arc<dyn PropsValidator>) -> &mut Self {
        self.validator = validator;
        self
    }

    /// Validates the declared props through the validator collaborator.
    ///
    /// Invocable at any time; typically called once after registration and
    /// configuration are complete, before the addon is handed to the server.
    pub fn validate(&self) -> AddonResult<()> {
        self.validator.validate(&self.props())
    }

    // ─── Composition ─────────────────────────────────────────────────────

    /// Appends `child` to the ordered child list.
    ///
    /// Duplicate child ids are accepted — ambiguity resolution belongs to
    /// the discovery/serving layer — but logged so misconfigured
    /// repositories are visible.
    pub fn add_addon(&mut self, child: Arc<Addon>) -> &mut Self {
        if self.children.iter().any(|c| c.id() == child.id()) {
            warn!(
                parent = %self.id,
                child = %child.id(),
                "Duplicate child addon id — discovery order decides which one wins"
            );
        }
        self.children.push(child);
        self
    }

    /// Ordered, read-only view of the child addons (insertion order).
    pub fn addons(&self) -> &[Arc<Addon>] {
        &self.children
    }
}

impl fmt::Debug for Addon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Addon")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("actions", &self.registry.len())
            .field("children", &self.children.len())
            .finish()
    }
}

// ─── Built-in handlers ────────────────────────────────────────────────────────

/// Built-in `selftest`: exercises the cache round-trip contract end-to-end.
///
/// The key combines a millisecond timestamp with a random nonce so rapid
/// successive or concurrent invocations never collide.
fn selftest_handler() -> ActionHandler {
    handler(|_input, ctx: Arc<ActionContext>| async move {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let key = format!("selftest-{millis}-{:016x}", rand::random::<u64>());

        ctx.cache().set(&key, SELFTEST_SENTINEL, SELFTEST_TTL).await?;
        match ctx.cache().get(&key).await? {
            Some(value) if value == SELFTEST_SENTINEL => Ok(Value::String("ok".to_string())),
            got => Err(AddonError::CacheIntegrity {
                key,
                expected: SELFTEST_SENTINEL.to_string(),
                got,
            }),
        }
    })
}

/// Built-in `addon`: returns the props deep copy over the same dispatch path
/// used for domain actions.
fn introspect_handler(props: Value) -> ActionHandler {
    handler(move |_input, _ctx| {
        let props = props.clone();
        async move { Ok(props) }
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, MemoryCache};
    use crate::error::CacheResult;
    use async_trait::async_trait;
    use serde_json::json;

    fn worker() -> Addon {
        Addon::new(json!({
            "id": "demo-worker",
            "type": "worker",
            "version": "1.0.0",
            "name": { "en": "Demo Worker" },
        }))
        .unwrap()
    }

    fn ctx_with(cache: Arc<dyn Cache>) -> Arc<ActionContext> {
        Arc::new(ActionContext::new(cache))
    }

    #[test]
    fn test_identity_from_props() {
        let addon = worker();
        assert_eq!(addon.id(), "demo-worker");
        assert_eq!(addon.kind(), AddonType::Worker);
        assert_eq!(addon.version(), "1.0.0");
    }

    #[test]
    fn test_rejects_missing_identity() {
        let err = Addon::new(json!({ "id": "x" })).unwrap_err();
        assert!(matches!(err, AddonError::Validation(_)));
    }

    #[test]
    fn test_builtins_present() {
        let addon = worker();
        assert!(addon.has_handler("selftest"));
        assert!(addon.has_handler("addon"));
    }

    #[test]
    fn test_builtins_are_removable() {
        let mut addon = worker();
        addon.unregister_handler("selftest");
        assert!(!addon.has_handler("selftest"));
        assert!(addon.handler("selftest").is_err());
    }

    #[test]
    fn test_props_copies_are_independent() {
        let addon = worker();
        let mut first = addon.props();
        let second = addon.props();
        assert_eq!(first, second);

        first["name"]["en"] = json!("mutated");
        assert_ne!(first, addon.props());
        assert_eq!(second, addon.props());
    }

    #[test]
    fn test_major_version() {
        assert_eq!(worker().major_version().unwrap(), 1);

        let beta = Addon::with_identity("beta", AddonType::Worker, "2.3.4-beta").unwrap();
        assert_eq!(beta.major_version().unwrap(), 2);

        let broken = Addon::with_identity("broken", AddonType::Worker, "not-a-version").unwrap();
        let err = broken.major_version().unwrap_err();
        match err {
            AddonError::VersionParse { id, version, .. } => {
                assert_eq!(id, "broken");
                assert_eq!(version, "not-a-version");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cache_options_merge() {
        let mut addon = worker();
        addon.set_default_cache_options([("a".to_string(), json!(1))].into_iter().collect());
        addon.set_default_cache_options([("b".to_string(), json!(2))].into_iter().collect());
        assert_eq!(
            Value::Object(addon.default_cache_options().clone()),
            json!({ "a": 1, "b": 2 })
        );

        addon.set_default_cache_options([("a".to_string(), json!(3))].into_iter().collect());
        assert_eq!(
            Value::Object(addon.default_cache_options().clone()),
            json!({ "a": 3, "b": 2 })
        );
    }

    #[tokio::test]
    async fn test_selftest_ok_against_faithful_cache() {
        let addon = worker();
        let out = addon
            .dispatch("selftest", Value::Null, ctx_with(Arc::new(MemoryCache::new())))
            .await
            .unwrap();
        assert_eq!(out, json!("ok"));
    }

    /// Cache double that answers every `get` with a fixed value, regardless
    /// of what was stored.
    struct LossyCache(Option<String>);

    #[async_trait]
    impl Cache for LossyCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Ok(self.0.clone())
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_selftest_detects_corrupted_value() {
        let addon = worker();
        let err = addon
            .dispatch(
                "selftest",
                Value::Null,
                ctx_with(Arc::new(LossyCache(Some("9".to_string())))),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AddonError::CacheIntegrity { got: Some(v), .. } if v == "9"));
    }

    #[tokio::test]
    async fn test_selftest_detects_dropped_value() {
        let addon = worker();
        let err = addon
            .dispatch("selftest", Value::Null, ctx_with(Arc::new(LossyCache(None))))
            .await
            .unwrap_err();
        assert!(matches!(err, AddonError::CacheIntegrity { got: None, .. }));
    }

    #[tokio::test]
    async fn test_introspection_returns_own_props() {
        let mut repo = Addon::with_identity("repo", AddonType::Repository, "1.0.0").unwrap();
        let child = Arc::new(worker());
        repo.add_addon(child);

        let out = repo
            .dispatch("addon", Value::Null, ctx_with(Arc::new(MemoryCache::new())))
            .await
            .unwrap();
        assert_eq!(out, repo.props());
        assert_eq!(out["id"], json!("repo"));
    }

    #[test]
    fn test_children_preserve_insertion_order() {
        let mut repo = Addon::with_identity("repo", AddonType::Repository, "1.0.0").unwrap();
        let x = Arc::new(Addon::with_identity("x", AddonType::Worker, "1.0.0").unwrap());
        let y = Arc::new(Addon::with_identity("y", AddonType::ContentSource, "1.0.0").unwrap());
        repo.add_addon(Arc::clone(&x)).add_addon(Arc::clone(&y));

        let ids: Vec<&str> = repo.addons().iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn test_duplicate_child_ids_accepted() {
        let mut repo = Addon::with_identity("repo", AddonType::Repository, "1.0.0").unwrap();
        let a = Arc::new(Addon::with_identity("dup", AddonType::Worker, "1.0.0").unwrap());
        let b = Arc::new(Addon::with_identity("dup", AddonType::Worker, "2.0.0").unwrap());
        repo.add_addon(a).add_addon(b);
        assert_eq!(repo.addons().len(), 2);
    }

    #[test]
    fn test_validate_uses_collaborator() {
        struct RejectAll;
        impl PropsValidator for RejectAll {
            fn validate(&self, _props: &Value) -> AddonResult<()> {
                Err(AddonError::validation("rejected"))
            }
        }

        let mut addon = worker();
        assert!(addon.validate().is_ok());

        addon.set_validator(Arc::new(RejectAll));
        assert!(addon.validate().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_action() {
        let addon = worker();
        let err = addon
            .dispatch("launch", Value::Null, ctx_with(Arc::new(MemoryCache::new())))
            .await
            .unwrap_err();
        assert!(matches!(err, AddonError::HandlerNotFound { action } if action == "launch"));
    }

    #[tokio::test]
    async fn test_replace_builtin_handler() {
        let mut addon = worker();
        addon.register_handler(
            "selftest",
            handler(|_, _| async move { Ok(json!("custom")) }),
        );
        let out = addon
            .dispatch("selftest", Value::Null, ctx_with(Arc::new(MemoryCache::new())))
            .await
            .unwrap();
        assert_eq!(out, json!("custom"));
    }
}
