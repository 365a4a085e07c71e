//! Action registry: the per-addon mapping from action name to handler.
//!
//! Each [`Addon`](crate::addon::Addon) owns exactly one [`ActionRegistry`];
//! no two addons share one. The registry is mutated during the setup phase
//! and treated as read-mostly once serving begins — concurrent mutation
//! during live serving is unsupported.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::context::ActionContext;
use crate::error::{AddonError, AddonResult};

// ─── Handler types ────────────────────────────────────────────────────────────

/// Boxed future returned by an action handler.
pub type HandlerFuture = BoxFuture<'static, AddonResult<Value>>;

/// A registered action handler.
///
/// Handlers take an opaque JSON input and a per-invocation
/// [`ActionContext`], and must be callable any number of times — any shared
/// mutable state beyond what the context provides is the handler's own
/// responsibility.
pub type ActionHandler = Arc<dyn Fn(Value, Arc<ActionContext>) -> HandlerFuture + Send + Sync>;

/// Wraps an async closure into an [`ActionHandler`].
///
/// # Example
///
/// ```rust,ignore
/// use armature_core::registry::handler;
///
/// let echo = handler(|input, _ctx| async move { Ok(input) });
/// ```
pub fn handler<F, Fut>(f: F) -> ActionHandler
where
    F: Fn(Value, Arc<ActionContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AddonResult<Value>> + Send + 'static,
{
    Arc::new(move |input, ctx| -> HandlerFuture { Box::pin(f(input, ctx)) })
}

// ─── ActionRegistry ───────────────────────────────────────────────────────────

/// Mapping from action name to handler with lookup/dispatch contracts.
///
/// Names have no format constraint beyond being non-empty; the last
/// registration for a given name wins.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the handler for `action`.
    ///
    /// Names carry no format constraint beyond being non-empty; the empty
    /// string is a caller bug and trips a debug assertion.
    pub fn register(&mut self, action: impl Into<String>, handler: ActionHandler) {
        let action = action.into();
        debug_assert!(!action.is_empty(), "action name must be non-empty");
        self.handlers.insert(action, handler);
    }

    /// Removes the handler for `action`. No-op when absent.
    pub fn unregister(&mut self, action: &str) {
        self.handlers.remove(action);
    }

    /// Returns `true` when a handler is registered for `action`.
    pub fn has(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Returns the handler for `action`.
    ///
    /// # Errors
    ///
    /// [`AddonError::HandlerNotFound`] when no handler is registered —
    /// callers at the dispatch boundary must surface this distinctly from
    /// "handler ran and failed".
    pub fn get(&self, action: &str) -> AddonResult<ActionHandler> {
        self.handlers
            .get(action)
            .cloned()
            .ok_or_else(|| AddonError::handler_not_found(action))
    }

    /// Returns all registered action names, in no particular order.
    pub fn action_names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` when no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
