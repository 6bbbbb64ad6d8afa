//! Versioned schema wire format
//!
//! A schema document is the envelope
//! `{"$version": "1.0", "$body": <node>, "$metadata": {..}}` where every node
//! is `{"$type": <id>, "$body": <type config>, "$metadata": {..}}`.

use crate::error::WireError;
use crate::node::{Metadata, SchemaNode};
use crate::registry::{self, Registry};
use serde_json::{Map, Value};

/// The only wire version this crate reads and writes
pub const SCHEMA_VERSION: &str = "1.0";

/// A decoded schema document
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    pub schema: SchemaNode,
    pub metadata: Option<Metadata>,
}

/// Encode `schema` as an envelope value
pub fn encode_schema(schema: &SchemaNode, metadata: Option<&Metadata>) -> Result<Value, WireError> {
    if schema.schema_type().is_none() && schema.is_resolved() {
        return Err(WireError::NoSchemaType);
    }

    let mut envelope = Map::new();
    envelope.insert("$version".to_string(), Value::String(SCHEMA_VERSION.to_string()));
    envelope.insert("$body".to_string(), serde_json::to_value(schema)?);
    if let Some(metadata) = metadata {
        envelope.insert("$metadata".to_string(), serde_json::to_value(metadata)?);
    }
    Ok(Value::Object(envelope))
}

/// Encode `schema` as compact envelope text
pub fn encode_schema_string(schema: &SchemaNode, metadata: Option<&Metadata>) -> Result<String, WireError> {
    Ok(serde_json::to_string(&encode_schema(schema, metadata)?)?)
}

/// Encode `schema` as indented envelope text
pub fn encode_schema_pretty(schema: &SchemaNode, metadata: Option<&Metadata>) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(&encode_schema(schema, metadata)?)?)
}

/// Decode envelope text using the current registry
pub fn decode_schema(text: &str) -> Result<SchemaDocument, WireError> {
    decode_schema_with(text, &registry::current())
}

/// Decode envelope text using `registry`
pub fn decode_schema_with(text: &str, registry: &Registry) -> Result<SchemaDocument, WireError> {
    let value: Value = serde_json::from_str(text)?;
    decode_schema_value(value, registry)
}

/// Decode an already parsed envelope using `registry`.
///
/// The version is checked before anything else, so a document of the wrong
/// version is rejected without resolving any of its types.
pub fn decode_schema_value(value: Value, registry: &Registry) -> Result<SchemaDocument, WireError> {
    let mut envelope = match value {
        Value::Object(envelope) => envelope,
        other => {
            return Err(WireError::Malformed(format!(
                "expected a schema envelope object, found {}",
                other
            )))
        }
    };

    match envelope.remove("$version") {
        Some(Value::String(version)) if version == SCHEMA_VERSION => {}
        Some(other) => {
            return Err(WireError::UnsupportedVersion {
                expected: SCHEMA_VERSION,
                found: other.to_string(),
            })
        }
        None => {
            return Err(WireError::MissingVersion {
                expected: SCHEMA_VERSION,
            })
        }
    }

    let body = match envelope.remove("$body") {
        Some(body) if !body.is_null() => body,
        _ => return Err(WireError::MissingBody),
    };

    let metadata = match envelope.remove("$metadata") {
        Some(Value::Null) | None => None,
        Some(metadata) => Some(serde_json::from_value::<Metadata>(metadata)?),
    };

    let mut schema: SchemaNode = serde_json::from_value(body)?;
    schema.resolve(registry)?;

    tracing::debug!(
        schema_type = schema.schema_type_id().unwrap_or_default(),
        "decoded schema document"
    );

    Ok(SchemaDocument { schema, metadata })
}
