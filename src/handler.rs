//! Binds `Action`s to user-supplied handler functions.
//!
//! The protocol this engine implements discovers handlers by scanning a
//! target object for functions an `@on`/`@after` decorator tagged with
//! `(action, skip_schema_validation, call_unique_id_required)` in its
//! reference form (see `routing.py`'s `create_route_map`). Rust has no
//! runtime reflection over a type's methods, so handlers are registered
//! through an explicit builder the host application calls at construction
//! time instead of at definition time. No information from the
//! `(action, kind, skip_schema_validation, call_unique_id_required)` tuple
//! is lost.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::error::OcppError;
use crate::schema_registry::Action;

/// The snake_case payload plus, when the binding requires it, the
/// originating Call's `unique_id` under the reserved name `call_unique_id`
/// — the concrete shape "named arguments" takes without Rust's equivalent
/// of Python's `**kwargs`.
#[derive(Debug, Clone)]
pub struct HandlerArgs {
    pub payload: serde_json::Map<String, Value>,
    pub call_unique_id: Option<String>,
}

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An `on_action` or `after_action` callback. Boxed and `Arc`-shared because
/// the session engine invokes the same binding repeatedly and may dispatch
/// `after_action` calls onto a separate task.
pub type Handler = Arc<dyn Fn(HandlerArgs) -> BoxFuture<'static, Result<Value, OcppError>> + Send + Sync>;

/// One action's handler binding: a required `on_action`, an optional
/// `after_action`, and the two per-action flags the reference decorator
/// attaches.
#[derive(Clone)]
pub struct HandlerBinding {
    pub on_action: Handler,
    pub after_action: Option<Handler>,
    pub skip_schema_validation: bool,
    pub call_unique_id_required: bool,
}

/// The engine's immutable (post-construction) action → binding map.
#[derive(Clone)]
pub struct HandlerRegistry {
    bindings: HashMap<Action, HandlerBinding>,
}

impl HandlerRegistry {
    pub fn get(&self, action: Action) -> Option<&HandlerBinding> {
        self.bindings.get(&action)
    }

    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }
}

/// Accumulates handler bindings before a session starts. A second
/// `on_action` for the same action is rejected at `build()` time, since
/// a second on-action handler for one action is a configuration error.
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    on_actions: HashMap<Action, (Handler, bool, bool)>,
    after_actions: HashMap<Action, Handler>,
}

impl HandlerRegistryBuilder {
    /// Registers the `on_action` handler for `action`. Returns an error
    /// immediately (rather than only at `build()`) if `action` already has
    /// one, since the duplicate is detectable the moment it's made, which
    /// is strictly earlier than build time.
    pub fn on_action(
        mut self,
        action: Action,
        skip_schema_validation: bool,
        call_unique_id_required: bool,
        handler: Handler,
    ) -> Result<Self, OcppError> {
        if self.on_actions.contains_key(&action) {
            return Err(OcppError::DuplicateHandler(action.to_string()));
        }
        self.on_actions.insert(action, (handler, skip_schema_validation, call_unique_id_required));
        Ok(self)
    }

    /// Registers the `after_action` handler for `action`. A second call
    /// for the same action replaces the first — only `on_action` duplicates
    /// are a configuration error; one `on_action` and one `after_action`
    /// may coexist on the same action.
    pub fn after_action(mut self, action: Action, handler: Handler) -> Self {
        self.after_actions.insert(action, handler);
        self
    }

    pub fn build(self) -> HandlerRegistry {
        let mut bindings = HashMap::with_capacity(self.on_actions.len());
        for (action, (on_action, skip_schema_validation, call_unique_id_required)) in self.on_actions {
            let after_action = self.after_actions.get(&action).cloned();
            bindings.insert(
                action,
                HandlerBinding { on_action, after_action, skip_schema_validation, call_unique_id_required },
            );
        }
        HandlerRegistry { bindings }
    }
}
