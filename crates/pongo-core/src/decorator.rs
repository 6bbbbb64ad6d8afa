//! Per-action behavior overrides for any schema type
//!
//! [`Decorated`] wraps a schema type and intercepts `process` with a handler
//! chosen by action, falling back to a default handler and then to the
//! wrapped type itself. It reports the wrapped type's id and body, so a
//! decorated schema encodes exactly like the undecorated one.

use crate::action::Action;
use crate::data::Data;
use crate::error::{BoxError, JsonSchemaError, SchemaError};
use crate::node::{SchemaNode, SchemaType};
use crate::path::DataPointer;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Handler invoked in place of the wrapped type's `process`.
///
/// Receives the wrapped type so it can delegate. Any error it returns is
/// normalized with [`SchemaError::cast`].
pub type DecoratorFn =
    Arc<dyn Fn(&dyn SchemaType, Action, &DataPointer) -> Result<Data, BoxError> + Send + Sync>;

#[derive(Clone)]
pub struct Decorated {
    inner: Box<dyn SchemaType>,
    handlers: HashMap<Action, DecoratorFn>,
    default_handler: Option<DecoratorFn>,
}

impl Decorated {
    pub fn new(inner: impl SchemaType) -> Self {
        Self::from_boxed(Box::new(inner))
    }

    pub fn from_boxed(inner: Box<dyn SchemaType>) -> Self {
        Self {
            inner,
            handlers: HashMap::new(),
            default_handler: None,
        }
    }

    pub fn inner(&self) -> &dyn SchemaType {
        self.inner.as_ref()
    }

    /// Use `handler` for each of `actions`
    pub fn set_handlers<F>(&mut self, handler: F, actions: impl IntoIterator<Item = Action>) -> &mut Self
    where
        F: Fn(&dyn SchemaType, Action, &DataPointer) -> Result<Data, BoxError> + Send + Sync + 'static,
    {
        let handler: DecoratorFn = Arc::new(handler);
        for action in actions {
            self.handlers.insert(action, Arc::clone(&handler));
        }
        self
    }

    pub fn unset_handlers(&mut self, actions: impl IntoIterator<Item = Action>) -> &mut Self {
        for action in actions {
            self.handlers.remove(&action);
        }
        self
    }

    /// Use `handler` for actions without their own handler
    pub fn set_default_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&dyn SchemaType, Action, &DataPointer) -> Result<Data, BoxError> + Send + Sync + 'static,
    {
        self.default_handler = Some(Arc::new(handler));
        self
    }

    pub fn unset_default_handler(&mut self) -> &mut Self {
        self.default_handler = None;
        self
    }

    pub fn has_handler(&self, action: Action) -> bool {
        self.handlers.contains_key(&action) || self.default_handler.is_some()
    }
}

impl fmt::Debug for Decorated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<&Action> = self.handlers.keys().collect();
        actions.sort();
        f.debug_struct("Decorated")
            .field("inner", &self.inner)
            .field("handlers", &actions)
            .field("default_handler", &self.default_handler.is_some())
            .finish()
    }
}

/// Decorated types compare by the wrapped type only; handlers are opaque.
impl PartialEq for Decorated {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_dyn(other.inner.as_ref())
    }
}

impl SchemaType for Decorated {
    fn schema_type_id(&self) -> &str {
        self.inner.schema_type_id()
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let handler = self
            .handlers
            .get(&action)
            .or(self.default_handler.as_ref());

        match handler {
            Some(handler) => handler(self.inner.as_ref(), action, pointer)
                .map_err(|err| SchemaError::cast(pointer.path(), err)),
            None => self.inner.process(action, pointer),
        }
    }

    fn children(&self) -> Vec<&SchemaNode> {
        self.inner.children()
    }

    fn children_mut(&mut self) -> Vec<&mut SchemaNode> {
        self.inner.children_mut()
    }

    fn encode_body(&self) -> serde_json::Result<Value> {
        self.inner.encode_body()
    }

    fn decode_body(&mut self, body: Value) -> serde_json::Result<()> {
        self.inner.decode_body(body)
    }

    fn json_schema(&self, action: Action) -> Option<Result<Value, JsonSchemaError>> {
        self.inner.json_schema(action)
    }
}
