//! Conjunction schema type

use super::{child_fragments, current};
use crate::action::Action;
use crate::data::Data;
use crate::error::{ErrorCause, JsonSchemaError, SchemaError};
use crate::node::{SchemaNode, SchemaType};
use crate::path::DataPointer;
use crate::property::ActionFlag;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Passes when every element passes.
///
/// All elements run even after a failure, so every failure is reported. The
/// output is the last element's output. When chaining is enabled for the
/// action, each element sees the previous successful element's output
/// instead of the original input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllOfType {
    #[serde(default)]
    elements: Vec<SchemaNode>,

    #[serde(default)]
    chain: ActionFlag,
}

impl AllOfType {
    pub fn new(elements: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
            chain: ActionFlag::default(),
        }
    }

    /// Append an element
    pub fn with(mut self, element: impl Into<SchemaNode>) -> Self {
        self.elements.push(element.into());
        self
    }

    /// Enable or disable chaining for every action
    pub fn chain(mut self, chain: bool) -> Self {
        self.chain.set_all(chain);
        self
    }

    /// Enable chaining for the given actions only
    pub fn chain_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.chain = ActionFlag::only(actions);
        self
    }

    pub fn elements(&self) -> &[SchemaNode] {
        &self.elements
    }

    pub fn chain_flag(&self) -> &ActionFlag {
        &self.chain
    }
}

impl SchemaType for AllOfType {
    fn schema_type_id(&self) -> &str {
        "allOf"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let chain = self.chain.enabled(action);
        let mut pointer = pointer.clone();
        let mut errors = SchemaError::new();
        let mut output = None;

        for element in &self.elements {
            match element.process(action, &pointer) {
                Ok(value) => {
                    if chain {
                        if let Err(err) = pointer.set_override(value.clone()) {
                            errors = errors.append(pointer.path(), ErrorCause::from(err));
                        }
                    }
                    output = Some(value);
                }
                Err(err) => errors = errors.merge(err),
            }
        }

        if !errors.is_empty() {
            tracing::trace!(failures = errors.len(), path = %pointer.path(), "allOf rejected value");
            return Err(errors);
        }
        Ok(output.unwrap_or_else(|| current(&pointer).clone()))
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
        Some(child_fragments(&self.elements, action).map(|all_of| json!({ "allOf": all_of })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IntType, StringType};

    fn parse(schema: &AllOfType, data: Data) -> Result<Data, SchemaError> {
        schema.process(Action::Parse, &DataPointer::new(data, "allOf"))
    }

    fn int_then_text() -> AllOfType {
        AllOfType::default()
            .with(IntType::new())
            .with(StringType::new().cast(true))
            .with(StringType::new().min_len(2))
    }

    #[test]
    fn test_unchained_reports_every_failure() {
        let err = parse(&int_then_text(), Data::Int(123)).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(matches!(err.errors()[0].cause(), ErrorCause::TypeMismatch { expected: "string", .. }));
    }

    #[test]
    fn test_chained_feeds_previous_output() {
        let schema = int_then_text().chain(true);
        assert_eq!(parse(&schema, Data::Int(123)).unwrap(), Data::from("123"));

        let err = parse(&schema, Data::Int(1)).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::TooShort { actual: 1, min: 2 }));
    }

    #[test]
    fn test_chain_per_action() {
        let schema = int_then_text().chain_actions([Action::Serialize]);
        assert!(parse(&schema, Data::Int(123)).is_err());
        assert!(schema
            .process(Action::Serialize, &DataPointer::new(Data::Int(123), "allOf"))
            .is_ok());
    }

    #[test]
    fn test_chain_does_not_leak_to_caller() {
        let pointer = DataPointer::new(Data::Int(42), "allOf");
        let schema = int_then_text().chain(true);
        schema.process(Action::Parse, &pointer).unwrap();
        assert_eq!(pointer.get(), Some(&Data::Int(42)));
    }

    #[test]
    fn test_empty_passes_input_through() {
        assert_eq!(parse(&AllOfType::default(), Data::from("x")).unwrap(), Data::from("x"));
    }

    #[test]
    fn test_body() {
        let schema = AllOfType::default().with(IntType::new()).chain_actions([Action::Parse]);
        assert_eq!(
            schema.encode_body().unwrap(),
            json!({"elements": [{"$type": "int"}], "chain": ["PARSE"]})
        );
    }
}
