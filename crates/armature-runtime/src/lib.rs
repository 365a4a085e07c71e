//! # Armature Runtime
//!
//! Bootstrap and serving orchestration for the Armature addon framework.
//!
//! This layer turns a list of external addon references into a validated,
//! ready-to-serve addon set:
//!
//! 1. [`OptionsLoader`](config::OptionsLoader) merges serve options from the
//!    conventional `armature.toml` probe, `ARMATURE_*` environment
//!    variables, and runtime-argument overrides (later wins).
//! 2. [`load_addons`](bootstrap::load_addons) resolves every reference
//!    through an [`AddonResolver`](resolver::AddonResolver) — all-or-nothing
//!    — and runs the setup-time gates (props validation, version parse).
//! 3. [`start`](bootstrap::start) hands the set and the merged options to
//!    the external [`AddonServer`](serve::AddonServer), which holds control
//!    until shutdown.
//!
//! ## Example
//!
//! ```rust,ignore
//! use armature_runtime::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut resolver = FactoryResolver::new();
//!     resolver.register("iptv-example", || Ok(build_iptv_addon()?));
//!     resolver.register("worker-example", || Ok(build_worker_addon()?));
//!
//!     bootstrap::run(&resolver, &MyServer::new()).await
//! }
//! ```

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod logging;
pub mod resolver;
pub mod serve;

pub use bootstrap::{StartArgs, load_addons, run, start};
pub use config::{LogFormat, LogLevel, LoggingConfig, OPTIONS_FILE, OptionsLoader, ServeOptions};
pub use error::{BootstrapError, BootstrapResult, ConfigError, ConfigResult};
pub use resolver::{AddonFactory, AddonResolver, BoxError, FactoryResolver};
pub use serve::AddonServer;
