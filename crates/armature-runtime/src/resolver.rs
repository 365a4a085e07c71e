//! Addon resolution: turning external references into descriptors.
//!
//! The bootstrap contract is only "produce an ordered list of addons from
//! external references" — *how* a reference resolves is the host's choice.
//! [`FactoryResolver`] is the bundled registration-based implementation: the
//! host registers a factory closure under each reference name at startup.
//! Hosts with other mechanisms (dynamic libraries, configuration-driven
//! registration) implement [`AddonResolver`] themselves.

use std::collections::HashMap;
use std::sync::Arc;

use armature_core::Addon;
use async_trait::async_trait;

use crate::error::BootstrapError;

/// Boxed error returned by addon factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Factory that builds a fresh [`Addon`] instance.
pub type AddonFactory = Arc<dyn Fn() -> Result<Addon, BoxError> + Send + Sync>;

// ─── AddonResolver trait ──────────────────────────────────────────────────────

/// Resolves one external reference to a usable addon instance.
#[async_trait]
pub trait AddonResolver: Send + Sync {
    /// Resolves `reference`, or fails with [`BootstrapError::Load`].
    async fn resolve(&self, reference: &str) -> Result<Addon, BootstrapError>;
}

// ─── FactoryResolver ──────────────────────────────────────────────────────────

/// [`AddonResolver`] backed by an explicit name → factory map.
///
/// # Example
///
/// ```rust,ignore
/// let mut resolver = FactoryResolver::new();
/// resolver.register("iptv-example", || build_iptv_addon());
/// ```
#[derive(Default)]
pub struct FactoryResolver {
    factories: HashMap<String, AddonFactory>,
}

impl FactoryResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `reference`; last registration wins.
    pub fn register<F>(&mut self, reference: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Addon, BoxError> + Send + Sync + 'static,
    {
        self.factories.insert(reference.into(), Arc::new(factory));
        self
    }

    /// Returns `true` when a factory is registered under `reference`.
    pub fn has(&self, reference: &str) -> bool {
        self.factories.contains_key(reference)
    }
}

#[async_trait]
impl AddonResolver for FactoryResolver {
    async fn resolve(&self, reference: &str) -> Result<Addon, BootstrapError> {
        let factory = self
            .factories
            .get(reference)
            .ok_or_else(|| BootstrapError::Load {
                reference: reference.to_string(),
                reason: "no addon factory registered under this reference".to_string(),
            })?;

        factory().map_err(|e| BootstrapError::Load {
            reference: reference.to_string(),
            reason: e.to_string(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use armature_core::AddonType;

    #[tokio::test]
    async fn test_resolves_registered_factory() {
        let mut resolver = FactoryResolver::new();
        resolver.register("demo", || {
            Ok(Addon::with_identity("demo", AddonType::Worker, "1.0.0")?)
        });

        let addon = resolver.resolve("demo").await.unwrap();
        assert_eq!(addon.id(), "demo");
    }

    #[tokio::test]
    async fn test_unknown_reference_fails() {
        let resolver = FactoryResolver::new();
        let err = resolver.resolve("ghost").await.unwrap_err();
        assert!(matches!(err, BootstrapError::Load { reference, .. } if reference == "ghost"));
    }

    #[tokio::test]
    async fn test_factory_error_is_wrapped() {
        let mut resolver = FactoryResolver::new();
        resolver.register("broken", || Err("factory exploded".into()));

        let err = resolver.resolve("broken").await.unwrap_err();
        assert!(err.to_string().contains("factory exploded"));
    }
}
