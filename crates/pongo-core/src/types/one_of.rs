//! Exclusive disjunction schema type

use super::child_fragments;
use crate::action::Action;
use crate::data::Data;
use crate::error::{ErrorCause, JsonSchemaError, SchemaError};
use crate::node::{SchemaNode, SchemaType};
use crate::path::DataPointer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Passes when exactly one element passes, with that element's output.
///
/// Every element always runs. With no match the element failures are
/// reported followed by [`ErrorCause::NoMatch`]; with several matches only
/// [`ErrorCause::AmbiguousMatch`] is reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneOfType {
    #[serde(default)]
    elements: Vec<SchemaNode>,
}

impl OneOfType {
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

impl SchemaType for OneOfType {
    fn schema_type_id(&self) -> &str {
        "oneOf"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let mut errors = SchemaError::new();
        let mut matches = 0;
        let mut output = None;

        for element in &self.elements {
            match element.process(action, pointer) {
                Ok(value) => {
                    matches += 1;
                    output.get_or_insert(value);
                }
                Err(err) => errors = errors.merge(err),
            }
        }

        tracing::trace!(matches, path = %pointer.path(), "oneOf evaluated");
        match (matches, output) {
            (1, Some(value)) => Ok(value),
            (0, _) => Err(errors.append(pointer.path(), ErrorCause::NoMatch)),
            (matches, _) => Err(SchemaError::with_error(
                pointer.path(),
                ErrorCause::AmbiguousMatch { matches },
            )),
        }
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
        Some(child_fragments(&self.elements, action).map(|one_of| json!({ "oneOf": one_of })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Float64Type, IntType, StringType};

    fn parse(schema: &OneOfType, data: Data) -> Result<Data, SchemaError> {
        schema.process(Action::Parse, &DataPointer::new(data, "oneOf"))
    }

    #[test]
    fn test_single_match() {
        let schema = OneOfType::default().with(IntType::new()).with(StringType::new());
        assert_eq!(parse(&schema, Data::Int(1)).unwrap(), Data::Int(1));
    }

    #[test]
    fn test_ambiguous_match() {
        let schema = OneOfType::default()
            .with(IntType::new())
            .with(Float64Type::new().cast(true))
            .with(StringType::new().cast(true));
        let err = parse(&schema, Data::Int(1)).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(matches!(err.errors()[0].cause(), ErrorCause::AmbiguousMatch { matches: 3 }));
    }

    #[test]
    fn test_no_match_lists_causes_then_no_match() {
        let schema = OneOfType::default().with(IntType::new()).with(StringType::new());
        let err = parse(&schema, Data::Bool(false)).unwrap_err();
        assert_eq!(err.len(), 3);
        assert!(matches!(err.errors()[2].cause(), ErrorCause::NoMatch));
    }

    #[test]
    fn test_empty_never_matches() {
        let err = parse(&OneOfType::default(), Data::Int(1)).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(matches!(err.errors()[0].cause(), ErrorCause::NoMatch));
    }
}
