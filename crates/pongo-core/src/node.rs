//! Schema nodes and the schema type contract
//!
//! A [`SchemaNode`] is one position in a schema tree. It owns an optional
//! [`SchemaType`] (the behavior), free-form metadata, and while being decoded
//! from the wire, the raw JSON fragment it came from.
//!
//! Decoding is two-phase. serde first builds the tree with every node holding
//! its raw fragment; [`SchemaNode::resolve`] then looks each `$type` up in a
//! [`Registry`] and fills in the behavior, recursing into children.

use crate::action::Action;
use crate::data::Data;
use crate::error::{ErrorCause, JsonSchemaError, SchemaError, WireError};
use crate::path::DataPointer;
use crate::registry::Registry;
use serde::de::Error as _;
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// Free-form text attributes attached to a node or a schema document
pub type Metadata = BTreeMap<String, String>;

/// Behavior of a schema: how it processes data and how it is encoded.
///
/// Implementors also get [`DynSchemaType`] for free when they are
/// `Clone + PartialEq`, which lets trees of boxed types be cloned and compared.
pub trait SchemaType: DynSchemaType + fmt::Debug + Send + Sync + 'static {
    /// Registry id, written as `$type` on the wire
    fn schema_type_id(&self) -> &str;

    /// Process the value under `pointer` in direction `action`
    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError>;

    /// Child nodes, for combinators
    fn children(&self) -> Vec<&SchemaNode> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut SchemaNode> {
        Vec::new()
    }

    /// Encode the type's configuration as the node's `$body`
    fn encode_body(&self) -> serde_json::Result<Value>;

    /// Replace the type's configuration with a decoded `$body`
    fn decode_body(&mut self, body: Value) -> serde_json::Result<()>;

    /// JSON Schema fragment describing the data this type accepts for
    /// `action`, or `None` when the type has no JSON Schema form
    fn json_schema(&self, _action: Action) -> Option<Result<Value, JsonSchemaError>> {
        None
    }
}

/// Object-safe cloning and comparison for boxed schema types
pub trait DynSchemaType {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn SchemaType>;
    fn eq_dyn(&self, other: &dyn SchemaType) -> bool;
}

impl<T> DynSchemaType for T
where
    T: SchemaType + Clone + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn SchemaType> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn SchemaType) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| other == self)
    }
}

impl Clone for Box<dyn SchemaType> {
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}

impl PartialEq for Box<dyn SchemaType> {
    fn eq(&self, other: &Self) -> bool {
        (**self).eq_dyn(&**other)
    }
}

/// One position in a schema tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    schema_type: Option<Box<dyn SchemaType>>,
    metadata: Metadata,
    raw: Option<Value>,
}

impl SchemaNode {
    pub fn new(schema_type: impl SchemaType) -> Self {
        Self::from_boxed(Box::new(schema_type))
    }

    pub fn from_boxed(schema_type: Box<dyn SchemaType>) -> Self {
        Self {
            schema_type: Some(schema_type),
            metadata: Metadata::new(),
            raw: None,
        }
    }

    /// A node with no schema type; processing it fails
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn schema_type(&self) -> Option<&dyn SchemaType> {
        self.schema_type.as_deref()
    }

    pub fn schema_type_mut(&mut self) -> Option<&mut (dyn SchemaType + 'static)> {
        self.schema_type.as_deref_mut()
    }

    /// Downcast the schema type to a concrete type
    pub fn downcast_ref<T: SchemaType>(&self) -> Option<&T> {
        self.schema_type()?.as_any().downcast_ref::<T>()
    }

    pub fn set_schema_type(&mut self, schema_type: impl SchemaType) -> &mut Self {
        self.schema_type = Some(Box::new(schema_type));
        self
    }

    pub fn schema_type_id(&self) -> Option<&str> {
        self.schema_type().map(SchemaType::schema_type_id)
    }

    /// Direct children of this node
    pub fn children(&self) -> Vec<&SchemaNode> {
        self.schema_type().map(|t| t.children()).unwrap_or_default()
    }

    fn children_mut(&mut self) -> Vec<&mut SchemaNode> {
        self.schema_type
            .as_deref_mut()
            .map(|t| t.children_mut())
            .unwrap_or_default()
    }

    pub fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        match self.schema_type() {
            Some(schema_type) => schema_type.process(action, pointer),
            None => Err(SchemaError::with_error(pointer.path(), ErrorCause::NoSchemaType)),
        }
    }

    pub fn parse(&self, pointer: &DataPointer) -> Result<Data, SchemaError> {
        self.process(Action::Parse, pointer)
    }

    pub fn serialize(&self, pointer: &DataPointer) -> Result<Data, SchemaError> {
        self.process(Action::Serialize, pointer)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_metadata(key, value);
        self
    }

    pub fn remove_metadata(&mut self, key: &str) -> Option<String> {
        self.metadata.remove(key)
    }

    /// True once the node no longer holds an undecoded wire fragment
    pub fn is_resolved(&self) -> bool {
        self.raw.is_none()
    }

    /// Resolve the raw wire fragment of this node and its descendants
    /// against `registry`.
    pub fn resolve(&mut self, registry: &Registry) -> Result<(), WireError> {
        if let Some(raw) = self.raw.take() {
            let mut fields = match raw {
                Value::Object(fields) => fields,
                other => {
                    return Err(WireError::Malformed(format!(
                        "expected a schema node object, found {}",
                        other
                    )))
                }
            };

            let type_id = match fields.remove("$type") {
                Some(Value::String(type_id)) => type_id,
                Some(other) => {
                    return Err(WireError::Malformed(format!(
                        "$type must be a string, found {}",
                        other
                    )))
                }
                None => return Err(WireError::MissingType),
            };

            let mut schema_type = registry
                .get(&type_id)
                .ok_or_else(|| WireError::UnknownType(type_id.clone()))?;

            if let Some(body) = fields.remove("$body").filter(|body| !body.is_null()) {
                schema_type
                    .decode_body(body)
                    .map_err(|source| WireError::InvalidBody {
                        type_id: type_id.clone(),
                        source,
                    })?;
            }

            if let Some(metadata) = fields.remove("$metadata").filter(|m| !m.is_null()) {
                self.metadata = serde_json::from_value(metadata)?;
            }

            tracing::trace!(schema_type = %type_id, "resolved schema node");
            self.schema_type = Some(schema_type);
        }

        for child in self.children_mut() {
            child.resolve(registry)?;
        }
        Ok(())
    }
}

impl<T: SchemaType> From<T> for SchemaNode {
    fn from(schema_type: T) -> Self {
        SchemaNode::new(schema_type)
    }
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let schema_type = match (self.schema_type(), &self.raw) {
            (Some(schema_type), _) => schema_type,
            (None, Some(raw)) => return raw.serialize(serializer),
            (None, None) => return Err(S::Error::custom(WireError::NoSchemaType)),
        };

        let body = schema_type.encode_body().map_err(S::Error::custom)?;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("$type", schema_type.schema_type_id())?;
        if !is_empty_body(&body) {
            map.serialize_entry("$body", &body)?;
        }
        if !self.metadata.is_empty() {
            map.serialize_entry("$metadata", &self.metadata)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        if !raw.is_object() {
            return Err(D::Error::custom(format!(
                "expected a schema node object, found {}",
                raw
            )));
        }
        Ok(SchemaNode {
            schema_type: None,
            metadata: Metadata::new(),
            raw: Some(raw),
        })
    }
}
