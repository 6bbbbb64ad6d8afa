//! Keyed record schema type

use super::current;
use crate::action::Action;
use crate::data::{Data, Record};
use crate::error::{ErrorCause, JsonSchemaError, SchemaError};
use crate::node::{SchemaNode, SchemaType};
use crate::path::DataPointer;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accepts a record whose keys are all declared properties.
///
/// Missing required keys are reported together as one error. Otherwise each
/// unknown key and each failing property is reported separately, in the
/// order the keys appear in the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    #[serde(default)]
    properties: IndexMap<String, SchemaNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    required: Vec<String>,
}

impl ObjectType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property
    pub fn property(mut self, key: impl Into<String>, schema: impl Into<SchemaNode>) -> Self {
        self.properties.insert(key.into(), schema.into());
        self
    }

    /// Replace the required keys
    pub fn require<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.required = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &IndexMap<String, SchemaNode> {
        &self.properties
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }
}

impl SchemaType for ObjectType {
    fn schema_type_id(&self) -> &str {
        "object"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let record = match current(pointer) {
            Data::Record(record) => record,
            other => {
                return Err(SchemaError::with_error(
                    pointer.path(),
                    ErrorCause::NotAnObject { found: other.kind() },
                ))
            }
        };

        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|key| !record.contains_key(key.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            tracing::trace!(?missing, path = %pointer.path(), "required keys absent, skipping properties");
            return Err(SchemaError::with_error(
                pointer.path(),
                ErrorCause::MissingRequired(missing),
            ));
        }

        let mut errors = SchemaError::new();
        let mut output = Record::with_capacity(record.len());

        for (key, value) in record {
            let Some(schema) = self.properties.get(key) else {
                errors = errors.append(pointer.path(), ErrorCause::UnknownKey(key.clone()));
                continue;
            };

            let child = pointer.push(key.clone(), value.clone(), schema.schema_type_id().unwrap_or_default());
            match schema.process(action, &child) {
                Ok(value) => {
                    output.insert(key.clone(), value);
                }
                Err(err) => errors = errors.merge(err),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Data::Record(output))
    }

    fn children(&self) -> Vec<&SchemaNode> {
        self.properties.values().collect()
    }

    fn children_mut(&mut self) -> Vec<&mut SchemaNode> {
        self.properties.values_mut().collect()
    }

    fn encode_body(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn decode_body(&mut self, body: Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(body)?;
        Ok(())
    }

    fn json_schema(&self, action: Action) -> Option<Result<Value, JsonSchemaError>> {
        let mut properties = Map::new();
        for (key, schema) in &self.properties {
            match schema.schema_type().and_then(|t| t.json_schema(action)) {
                Some(Ok(fragment)) => {
                    properties.insert(key.clone(), fragment);
                }
                Some(Err(err)) => return Some(Err(err)),
                None => {}
            }
        }

        let mut object = Map::new();
        object.insert("type".into(), "object".into());
        object.insert("properties".into(), Value::Object(properties));
        if !self.required.is_empty() {
            object.insert("required".into(), self.required.clone().into());
        }
        object.insert("additionalProperties".into(), false.into());
        Some(Ok(Value::Object(object)))
    }
}
