//! Homogeneous list schema type

use super::{check_len, current, insert_opt};
use crate::action::Action;
use crate::data::Data;
use crate::error::{ErrorCause, JsonSchemaError, SchemaError};
use crate::node::{SchemaNode, SchemaType};
use crate::path::DataPointer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accepts a list whose every element matches the item schema.
///
/// Every element is processed, so one run reports all failing elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListType {
    #[serde(rename = "type", default)]
    item: Option<SchemaNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_len: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_len: Option<usize>,
}

impl ListType {
    pub fn new(item: impl Into<SchemaNode>) -> Self {
        Self {
            item: Some(item.into()),
            ..Self::default()
        }
    }

    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len);
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn item(&self) -> Option<&SchemaNode> {
        self.item.as_ref()
    }

    pub fn set_item(&mut self, item: impl Into<SchemaNode>) {
        self.item = Some(item.into());
    }
}

impl SchemaType for ListType {
    fn schema_type_id(&self) -> &str {
        "list"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let item = self
            .item
            .as_ref()
            .ok_or_else(|| SchemaError::with_error(pointer.path(), ErrorCause::MissingItemSchema))?;

        let elements = match current(pointer) {
            Data::List(elements) => elements,
            other => {
                return Err(SchemaError::with_error(
                    pointer.path(),
                    ErrorCause::NotAList { found: other.kind() },
                ))
            }
        };

        check_len(pointer, elements.len(), self.min_len, self.max_len)?;

        let item_type = item.schema_type_id().unwrap_or_default();
        let mut errors = SchemaError::new();
        let mut output = Vec::with_capacity(elements.len());

        for (index, element) in elements.iter().enumerate() {
            let child = pointer.push(format!("[{}]", index), element.clone(), item_type);
            match item.process(action, &child) {
                Ok(value) => output.push(value),
                Err(err) => errors = errors.merge(err),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Data::List(output))
    }

    fn children(&self) -> Vec<&SchemaNode> {
        self.item.iter().collect()
    }

    fn children_mut(&mut self) -> Vec<&mut SchemaNode> {
        self.item.iter_mut().collect()
    }

    fn encode_body(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn decode_body(&mut self, body: Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(body)?;
        Ok(())
    }

    fn json_schema(&self, action: Action) -> Option<Result<Value, JsonSchemaError>> {
        let mut array = Map::new();
        array.insert("type".into(), "array".into());
        insert_opt(&mut array, "minItems", self.min_len);
        insert_opt(&mut array, "maxItems", self.max_len);

        if let Some(item) = self.item.as_ref().and_then(SchemaNode::schema_type) {
            match item.json_schema(action) {
                Some(Ok(items)) => {
                    array.insert("items".into(), items);
                }
                Some(Err(err)) => return Some(Err(err)),
                None => {}
            }
        }
        Some(Ok(Value::Object(array)))
    }
}
