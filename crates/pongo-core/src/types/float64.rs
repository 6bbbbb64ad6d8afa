//! Floating point schema type

use super::{cast_failed, check_bounds, current, insert_opt, mismatch};
use crate::action::Action;
use crate::data::Data;
use crate::error::{JsonSchemaError, SchemaError};
use crate::node::SchemaType;
use crate::path::DataPointer;
use crate::property::ActionFlag;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Accepts 64-bit floats, optionally casting integers and decimal text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Float64Type {
    #[serde(default, skip_serializing_if = "ActionFlag::is_empty")]
    cast: ActionFlag,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
}

impl Float64Type {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cast(mut self, cast: bool) -> Self {
        self.cast.set_all(cast);
        self
    }

    pub fn cast_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.cast = ActionFlag::only(actions);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    fn float(&self, action: Action, pointer: &DataPointer) -> Result<f64, SchemaError> {
        match (current(pointer), self.cast.enabled(action)) {
            (Data::Float(f), _) => Ok(*f),
            (Data::Int(i), true) => Ok(*i as f64),
            (Data::String(s), true) => s.parse::<f64>().map_err(|e| cast_failed(pointer, "float64", e)),
            (_, true) => Err(cast_failed(pointer, "float64", "value is not numeric")),
            (_, false) => Err(mismatch(pointer, "float64")),
        }
    }
}

impl SchemaType for Float64Type {
    fn schema_type_id(&self) -> &str {
        "float64"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let value = self.float(action, pointer)?;
        check_bounds(pointer, &value, self.min.as_ref(), self.max.as_ref())?;
        Ok(Data::Float(value))
    }

    fn encode_body(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn decode_body(&mut self, body: Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(body)?;
        Ok(())
    }

    fn json_schema(&self, action: Action) -> Option<Result<Value, JsonSchemaError>> {
        let mut number = Map::new();
        number.insert("type".into(), "number".into());
        insert_opt(&mut number, "minimum", self.min);
        insert_opt(&mut number, "maximum", self.max);

        if !self.cast.enabled(action) {
            return Some(Ok(Value::Object(number)));
        }

        Some(Ok(json!({
            "oneOf": [
                Value::Object(number),
                {"type": "string", "pattern": "^-?[0-9]+(\\.[0-9]+)?$"}
            ]
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCause;

    fn parse(schema: &Float64Type, data: Data) -> Result<Data, SchemaError> {
        schema.process(Action::Parse, &DataPointer::new(data, "float64"))
    }

    #[test]
    fn test_strict_float() {
        assert_eq!(parse(&Float64Type::new(), Data::Float(0.5)).unwrap(), Data::Float(0.5));
        assert!(parse(&Float64Type::new(), Data::Int(1)).is_err());
    }

    #[test]
    fn test_cast() {
        let schema = Float64Type::new().cast(true);
        assert_eq!(parse(&schema, Data::Int(3)).unwrap(), Data::Float(3.0));
        assert_eq!(parse(&schema, "2.25".into()).unwrap(), Data::Float(2.25));
        assert!(parse(&schema, "two".into()).is_err());
        assert!(parse(&schema, Data::Null).is_err());
    }

    #[test]
    fn test_bounds() {
        let schema = Float64Type::new().min(-1.0).max(1.0);
        assert!(parse(&schema, Data::Float(1.0)).is_ok());

        let err = parse(&schema, Data::Float(1.5)).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::AboveMaximum { .. }));
    }
}
