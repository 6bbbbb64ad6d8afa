//! Byte sequence schema type

use super::{cast_failed, check_len, current, mismatch};
use crate::action::Action;
use crate::data::Data;
use crate::error::{JsonSchemaError, SchemaError};
use crate::node::SchemaType;
use crate::path::DataPointer;
use crate::property::ActionFlag;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Accepts raw bytes, optionally casting standard base64 text.
///
/// Parsing yields bytes and serializing yields base64 text. Lengths are
/// counted in bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BytesType {
    #[serde(default, skip_serializing_if = "ActionFlag::is_empty")]
    cast: ActionFlag,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_len: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_len: Option<usize>,
}

impl BytesType {
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

    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len);
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    fn bytes(&self, action: Action, pointer: &DataPointer) -> Result<Vec<u8>, SchemaError> {
        match (current(pointer), self.cast.enabled(action)) {
            (Data::Bytes(b), _) => Ok(b.clone()),
            (Data::String(s), true) => STANDARD.decode(s).map_err(|e| cast_failed(pointer, "bytes", e)),
            (_, true) => Err(cast_failed(pointer, "bytes", "expected base64 text")),
            (_, false) => Err(mismatch(pointer, "bytes")),
        }
    }
}

impl SchemaType for BytesType {
    fn schema_type_id(&self) -> &str {
        "bytes"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let bytes = self.bytes(action, pointer)?;
        check_len(pointer, bytes.len(), self.min_len, self.max_len)?;

        Ok(match action {
            Action::Parse => Data::Bytes(bytes),
            Action::Serialize => Data::String(STANDARD.encode(bytes)),
        })
    }

    fn encode_body(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn decode_body(&mut self, body: Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(body)?;
        Ok(())
    }

    /// Only base64 text has a JSON form: serialized output, or parse input
    /// when casting.
    fn json_schema(&self, action: Action) -> Option<Result<Value, JsonSchemaError>> {
        if action == Action::Parse && !self.cast.enabled(action) {
            return Some(Err(JsonSchemaError::NotExportable {
                schema_type: self.schema_type_id().to_string(),
                reason: "raw bytes have no JSON form unless cast from base64".to_string(),
            }));
        }
        Some(Ok(json!({"type": "string", "contentEncoding": "base64"})))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCause;

    fn run(schema: &BytesType, action: Action, data: Data) -> Result<Data, SchemaError> {
        schema.process(action, &DataPointer::new(data, "bytes"))
    }

    #[test]
    fn test_parse_and_serialize() {
        let schema = BytesType::new().cast(true);
        assert_eq!(
            run(&schema, Action::Parse, "aGVsbG8=".into()).unwrap(),
            Data::Bytes(b"hello".to_vec())
        );
        assert_eq!(
            run(&schema, Action::Serialize, Data::Bytes(b"hello".to_vec())).unwrap(),
            Data::from("aGVsbG8=")
        );
    }

    #[test]
    fn test_invalid_base64() {
        let err = run(&BytesType::new().cast(true), Action::Parse, "%%%".into()).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::CastFailed { target: "bytes", .. }));
    }

    #[test]
    fn test_strict_rejects_text() {
        assert!(run(&BytesType::new(), Action::Parse, "aGk=".into()).is_err());
    }

    #[test]
    fn test_length_in_bytes() {
        let schema = BytesType::new().max_len(2);
        let err = run(&schema, Action::Parse, Data::Bytes(vec![1, 2, 3])).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::TooLong { actual: 3, max: 2 }));
    }

    #[test]
    fn test_json_schema_needs_text() {
        assert!(BytesType::new().json_schema(Action::Parse).unwrap().is_err());
        assert!(BytesType::new().json_schema(Action::Serialize).unwrap().is_ok());
        assert!(BytesType::new().cast(true).json_schema(Action::Parse).unwrap().is_ok());
    }
}
