//! Integer schema type

use super::{cast_failed, check_bounds, current, insert_opt, mismatch, truncate_to_i64};
use crate::action::Action;
use crate::data::Data;
use crate::error::{JsonSchemaError, SchemaError};
use crate::node::SchemaType;
use crate::path::DataPointer;
use crate::property::ActionFlag;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Accepts 64-bit integers, optionally casting floats (truncated) and
/// decimal text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntType {
    #[serde(default, skip_serializing_if = "ActionFlag::is_empty")]
    cast: ActionFlag,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<i64>,
}

impl IntType {
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

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    fn integer(&self, action: Action, pointer: &DataPointer) -> Result<i64, SchemaError> {
        match (current(pointer), self.cast.enabled(action)) {
            (Data::Int(i), _) => Ok(*i),
            (Data::Float(f), true) => truncate_to_i64(*f)
                .ok_or_else(|| cast_failed(pointer, "int", "value is out of the 64-bit integer range")),
            (Data::String(s), true) => s.parse::<i64>().map_err(|e| cast_failed(pointer, "int", e)),
            (_, true) => Err(cast_failed(pointer, "int", "value is not numeric")),
            (_, false) => Err(mismatch(pointer, "int")),
        }
    }
}

impl SchemaType for IntType {
    fn schema_type_id(&self) -> &str {
        "int"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let value = self.integer(action, pointer)?;
        check_bounds(pointer, &value, self.min.as_ref(), self.max.as_ref())?;
        Ok(Data::Int(value))
    }

    fn encode_body(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn decode_body(&mut self, body: Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(body)?;
        Ok(())
    }

    fn json_schema(&self, action: Action) -> Option<Result<Value, JsonSchemaError>> {
        let mut integer = Map::new();
        integer.insert("type".into(), "integer".into());
        insert_opt(&mut integer, "minimum", self.min);
        insert_opt(&mut integer, "maximum", self.max);

        if !self.cast.enabled(action) {
            return Some(Ok(Value::Object(integer)));
        }

        integer.insert("type".into(), "number".into());
        Some(Ok(json!({
            "oneOf": [
                Value::Object(integer),
                {"type": "string", "pattern": "^-?[0-9]+$"}
            ]
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCause;

    fn parse(schema: &IntType, data: Data) -> Result<Data, SchemaError> {
        schema.process(Action::Parse, &DataPointer::new(data, "int"))
    }

    #[test]
    fn test_strict_int() {
        assert_eq!(parse(&IntType::new(), Data::Int(5)).unwrap(), Data::Int(5));
        assert!(parse(&IntType::new(), Data::Float(5.0)).is_err());
        assert!(parse(&IntType::new(), "5".into()).is_err());
    }

    #[test]
    fn test_cast() {
        let schema = IntType::new().cast(true);
        assert_eq!(parse(&schema, Data::Float(2.9)).unwrap(), Data::Int(2));
        assert_eq!(parse(&schema, Data::Float(-2.9)).unwrap(), Data::Int(-2));
        assert_eq!(parse(&schema, "-17".into()).unwrap(), Data::Int(-17));

        let err = parse(&schema, "12a".into()).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::CastFailed { target: "int", .. }));
        assert!(parse(&schema, Data::Float(f64::NAN)).is_err());
    }

    #[test]
    fn test_cast_rejects_floats_outside_i64() {
        let schema = IntType::new().cast(true);
        for value in [1e30, -1e30, 9.223372036854775807e18, f64::INFINITY] {
            let err = parse(&schema, Data::Float(value)).unwrap_err();
            assert!(matches!(err.errors()[0].cause(), ErrorCause::CastFailed { target: "int", .. }));
        }
        assert_eq!(
            parse(&schema, Data::Float(-9.223372036854775808e18)).unwrap(),
            Data::Int(i64::MIN)
        );
    }

    #[test]
    fn test_bounds() {
        let schema = IntType::new().min(0).max(10);
        assert!(parse(&schema, Data::Int(0)).is_ok());
        assert!(parse(&schema, Data::Int(10)).is_ok());

        let err = parse(&schema, Data::Int(-1)).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::BelowMinimum { .. }));

        let err = parse(&schema, Data::Int(11)).unwrap_err();
        assert_eq!(err.errors()[0].cause().to_string(), "value 11 is above the maximum 10");
    }

    #[test]
    fn test_json_schema() {
        let schema = IntType::new().min(1);
        assert_eq!(
            schema.json_schema(Action::Parse).unwrap().unwrap(),
            json!({"type": "integer", "minimum": 1})
        );

        let cast = IntType::new().cast_actions([Action::Parse]);
        let fragment = cast.json_schema(Action::Parse).unwrap().unwrap();
        assert!(fragment.get("oneOf").is_some());
    }
}
