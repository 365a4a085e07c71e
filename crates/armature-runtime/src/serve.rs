//! Serve entry point contract.
//!
//! The HTTP/transport server that turns actions into network endpoints is an
//! external collaborator; the core only requires this entry point. At request
//! time the server resolves an addon by id, looks up the action in its
//! registry, builds an [`ActionContext`](armature_core::ActionContext)
//! around the addon's cache configuration, and invokes the handler.

use std::sync::Arc;

use armature_core::Addon;
use async_trait::async_trait;

use crate::config::ServeOptions;
use crate::error::BootstrapError;

/// External serve entry point consumed by the bootstrap.
///
/// `serve` receives the complete, validated addon set (a composite
/// contributes itself; expanding its children is the server's concern) and
/// the merged options, and does not return until the host shuts down.
#[async_trait]
pub trait AddonServer: Send + Sync {
    /// Serves `addons` until shutdown.
    async fn serve(
        &self,
        addons: Vec<Arc<Addon>>,
        options: ServeOptions,
    ) -> Result<(), BootstrapError>;
}
