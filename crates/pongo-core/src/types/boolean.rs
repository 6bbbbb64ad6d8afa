//! Boolean schema type

use super::{cast_failed, current, mismatch};
use crate::action::Action;
use crate::data::Data;
use crate::error::{JsonSchemaError, SchemaError};
use crate::node::SchemaType;
use crate::path::DataPointer;
use crate::property::ActionFlag;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Accepts booleans.
///
/// When casting, `"true"`/`"false"` text (any case) is accepted, numbers are
/// true when non-zero, and bytes are true unless they are a single zero byte
/// or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolType {
    #[serde(default, skip_serializing_if = "ActionFlag::is_empty")]
    cast: ActionFlag,
}

impl BoolType {
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
}

impl SchemaType for BoolType {
    fn schema_type_id(&self) -> &str {
        "bool"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let value = match (current(pointer), self.cast.enabled(action)) {
            (Data::Bool(b), _) => *b,
            (Data::String(s), true) => match s.to_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => return Err(cast_failed(pointer, "bool", "expected \"true\" or \"false\"")),
            },
            (Data::Int(i), true) => *i != 0,
            (Data::Float(f), true) => *f != 0.0,
            (Data::Bytes(b), true) => b.len() > 1 || (b.len() == 1 && b[0] != 0),
            (_, true) => return Err(cast_failed(pointer, "bool", "value has no truth value")),
            (_, false) => return Err(mismatch(pointer, "bool")),
        };
        Ok(Data::Bool(value))
    }

    fn encode_body(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn decode_body(&mut self, body: Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(body)?;
        Ok(())
    }

    fn json_schema(&self, action: Action) -> Option<Result<Value, JsonSchemaError>> {
        if !self.cast.enabled(action) {
            return Some(Ok(json!({"type": "boolean"})));
        }
        Some(Ok(json!({
            "oneOf": [
                {"type": "boolean"},
                {"type": "number"},
                {"type": "string", "pattern": "^(?i)(true|false)$"}
            ]
        })))
    }
}
