//! Disjunction schema type

use super::child_fragments;
use crate::action::Action;
use crate::data::Data;
use crate::error::{ErrorCause, JsonSchemaError, SchemaError};
use crate::node::{SchemaNode, SchemaType};
use crate::path::DataPointer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Passes with the output of the first element that passes.
///
/// When none passes, the failures of every element are reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnyOfType {
    #[serde(default)]
    elements: Vec<SchemaNode>,
}

impl AnyOfType {
    pub fn new(elements: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    pub fn with(mut self, element: impl Into<SchemaNode>) -> Self {
        self.elements.push(element.into());
        self
    }

    pub fn elements(&self) -> &[SchemaNode] {
        &self.elements
    }
}

impl SchemaType for AnyOfType {
    fn schema_type_id(&self) -> &str {
        "anyOf"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let mut errors = SchemaError::new();
        for (index, element) in self.elements.iter().enumerate() {
            match element.process(action, pointer) {
                Ok(value) => {
                    tracing::trace!(index, path = %pointer.path(), "anyOf matched");
                    return Ok(value);
                }
                Err(err) => errors = errors.merge(err),
            }
        }

        if errors.is_empty() {
            errors = errors.append(pointer.path(), ErrorCause::NoMatch);
        }
        Err(errors)
    }

    fn children(&self) -> Vec<&SchemaNode> {
        self.elements.iter().collect()
    }

    fn children_mut(&mut self) -> Vec<&mut SchemaNode> {
        self.elements.iter_mut().collect()
    }

    fn encode_body(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn decode_body(&mut self, body: Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(body)?;
        Ok(())
    }

    fn json_schema(&self, action: Action) -> Option<Result<Value, JsonSchemaError>> {
        Some(child_fragments(&self.elements, action).map(|any_of| json!({ "anyOf": any_of })))
    }
}
