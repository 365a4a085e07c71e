//! # Armature
//!
//! A framework for defining "addons" — named, versioned units exposing a
//! registry of remotely-invokable named actions — and for composing many
//! addons into a hierarchical repository served by a host process.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐  resolve   ┌──────────────────────────────┐   serve   ┌────────┐
//! │ Bootstrap │───────────▶│ Addon "repo"  (children: …)  │──────────▶│  Host  │
//! │ (runtime) │───────────▶│ Addon "iptv"  (registry)     │──────────▶│ server │
//! └───────────┘───────────▶│ Addon "tasks" (registry)     │──────────▶│        │
//!                          └──────────────────────────────┘           └────────┘
//! ```
//!
//! - **Core**: addon descriptors, action registries, the execution context
//!   with its cache contract, composition, and version negotiation
//! - **Runtime**: options merging, logging, the resolver seam, and the
//!   all-or-nothing bootstrap that hands the addon set to the server
//! - **Host** (external): turns actions into network endpoints and supplies
//!   the cache backend
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use armature::prelude::*;
//!
//! fn build_addon() -> AddonResult<Addon> {
//!     let mut addon = Addon::new(serde_json::json!({
//!         "id": "hello",
//!         "type": "worker",
//!         "version": "1.0.0",
//!     }))?;
//!     addon.register_handler("greet", handler(|input, _ctx| async move {
//!         Ok(serde_json::json!({ "hello": input }))
//!     }));
//!     Ok(addon)
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut resolver = FactoryResolver::new();
//!     resolver.register("hello", || Ok(build_addon()?));
//!     armature::runtime::run(&resolver, &MyServer::new()).await
//! }
//! ```

pub use armature_core as core;
pub use armature_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use armature::prelude::*;
/// ```
pub mod prelude {
    // Core - addon definition
    pub use armature_core::{
        ADDON_API_MAJOR, ActionContext, ActionHandler, ActionRegistry, Addon, AddonError,
        AddonResult, AddonType, Cache, CacheOptions, MemoryCache, PropsValidator, handler,
    };

    // Runtime - bootstrap and serving
    pub use armature_runtime::{
        AddonResolver, AddonServer, BootstrapError, FactoryResolver, OptionsLoader, ServeOptions,
        StartArgs, load_addons, start,
    };
}
