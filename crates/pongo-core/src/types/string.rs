//! Text schema type

use super::{cast_failed, check_len, current, insert_opt, mismatch};
use crate::action::Action;
use crate::data::{format_rfc3339, Data};
use crate::error::{JsonSchemaError, SchemaError};
use crate::node::SchemaType;
use crate::path::DataPointer;
use crate::property::ActionFlag;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Accepts text, optionally casting numbers and timestamps into text.
///
/// Lengths are counted in characters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringType {
    #[serde(default, skip_serializing_if = "ActionFlag::is_empty")]
    cast: ActionFlag,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_len: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_len: Option<usize>,
}

impl StringType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable casting for every action
    pub fn cast(mut self, cast: bool) -> Self {
        self.cast.set_all(cast);
        self
    }

    /// Enable casting for the given actions only
    pub fn cast_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.cast = ActionFlag::only(actions);
        self
    }

    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len);
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn cast_flag(&self) -> &ActionFlag {
        &self.cast
    }

    fn text(&self, action: Action, pointer: &DataPointer) -> Result<String, SchemaError> {
        match (current(pointer), self.cast.enabled(action)) {
            (Data::String(s), _) => Ok(s.clone()),
            (Data::Int(i), true) => Ok(i.to_string()),
            (Data::Float(f), true) => Ok(f.to_string()),
            (Data::DateTime(t), true) => Ok(format_rfc3339(t)),
            (_, true) => Err(cast_failed(pointer, "string", "value has no text form")),
            (_, false) => Err(mismatch(pointer, "string")),
        }
    }
}

impl SchemaType for StringType {
    fn schema_type_id(&self) -> &str {
        "string"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let text = self.text(action, pointer)?;
        check_len(pointer, text.chars().count(), self.min_len, self.max_len)?;
        Ok(Data::String(text))
    }

    fn encode_body(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn decode_body(&mut self, body: Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(body)?;
        Ok(())
    }

    fn json_schema(&self, action: Action) -> Option<Result<Value, JsonSchemaError>> {
        let mut string = Map::new();
        string.insert("type".into(), "string".into());
        insert_opt(&mut string, "minLength", self.min_len);
        insert_opt(&mut string, "maxLength", self.max_len);

        if self.cast.enabled(action) {
            Some(Ok(json!({"oneOf": [Value::Object(string), {"type": "number"}]})))
        } else {
            Some(Ok(Value::Object(string)))
        }
    }
}
