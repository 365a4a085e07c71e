//! # Armature Core
//!
//! The core engine of the Armature addon framework.
//!
//! Armature defines "addons": named, versioned units exposing a registry of
//! remotely-invokable named actions, composable into hierarchical
//! repositories that a host process serves. This crate is the generic
//! machinery shared by every addon — the action logic itself lives in the
//! host's handlers.
//!
//! ## Components
//!
//! - **Cache contract**: the minimal key/value/TTL interface handlers
//!   consume through the execution context ([`Cache`], [`MemoryCache`])
//! - **Action registry**: per-addon name → handler mapping with
//!   lookup/dispatch contracts ([`ActionRegistry`], [`ActionHandler`])
//! - **Addon descriptor**: identity, defensive-copy props, cache defaults,
//!   and the two built-in actions `selftest` and `addon` ([`Addon`])
//! - **Composition**: an ordered child-addon list for discovery
//!   ([`Addon::add_addon`], [`Addon::addons`])
//! - **Version negotiation**: semver parsing for the fail-fast major-version
//!   gate ([`Addon::major_version`], [`ADDON_API_MAJOR`])
//! - **Execution context**: the per-invocation collaborator bundle
//!   ([`ActionContext`])
//!
//! ## Data flow
//!
//! ```text
//! ┌───────────┐  resolve   ┌─────────────┐  dispatch   ┌─────────────┐
//! │ Bootstrap │───────────▶│    Addon    │────────────▶│   Handler   │
//! │ (runtime) │            │  (registry) │  + context  │ (cache, …)  │
//! └───────────┘            └─────────────┘             └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use armature_core::{ActionContext, Addon, MemoryCache, handler};
//!
//! let mut addon = Addon::new(serde_json::json!({
//!     "id": "hello",
//!     "type": "worker",
//!     "version": "1.0.0",
//! }))?;
//! addon.register_handler("greet", handler(|input, _ctx| async move {
//!     Ok(serde_json::json!({ "hello": input }))
//! }));
//! addon.validate()?;
//!
//! let addon = Arc::new(addon);
//! let cache = Arc::new(MemoryCache::new());
//! let ctx = Arc::new(ActionContext::for_addon(&addon, cache));
//! let out = addon.dispatch("greet", serde_json::json!("world"), ctx).await?;
//! ```

pub mod addon;
pub mod cache;
pub mod context;
pub mod error;
pub mod registry;
pub mod validate;

pub use addon::{ADDON_API_MAJOR, Addon, AddonType};
pub use cache::{Cache, MemoryCache};
pub use context::{ActionContext, CacheOptions};
pub use error::{AddonError, AddonResult, CacheError, CacheResult};
pub use registry::{ActionHandler, ActionRegistry, HandlerFuture, handler};
pub use validate::{BasicPropsValidator, PropsValidator};
