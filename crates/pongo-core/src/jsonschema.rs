//! JSON Schema (draft-07) export

use crate::action::Action;
use crate::error::JsonSchemaError;
use crate::node::SchemaNode;
use serde_json::{Map, Value};

/// `$schema` URI of exported documents
pub const JSON_SCHEMA_DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Metadata key whose value becomes the exported `$id`
pub const JSON_SCHEMA_ID_KEY: &str = "$id";

/// Fragment for one node, without the document-level keys.
///
/// `None` means the node (or its type) has no JSON Schema form.
pub fn json_schema_fragment(node: &SchemaNode, action: Action) -> Option<Result<Value, JsonSchemaError>> {
    node.schema_type()?.json_schema(action)
}

/// Export `node` as a standalone JSON Schema document describing the data it
/// accepts for `action`.
///
/// A node without a JSON Schema form exports as the permissive `{}` schema.
pub fn export_json_schema(node: &SchemaNode, action: Action) -> Result<Value, JsonSchemaError> {
    let mut document = match json_schema_fragment(node, action).transpose()? {
        Some(Value::Object(fragment)) => fragment,
        Some(other) => {
            let mut wrapped = Map::new();
            wrapped.insert("allOf".to_string(), Value::Array(vec![other]));
            wrapped
        }
        None => Map::new(),
    };

    if let Some(id) = node.get_metadata(JSON_SCHEMA_ID_KEY) {
        document.insert("$id".to_string(), Value::String(id.to_string()));
    }
    document.insert(
        "$schema".to_string(),
        Value::String(JSON_SCHEMA_DRAFT_07.to_string()),
    );

    tracing::debug!(action = %action, "exported JSON schema");
    Ok(Value::Object(document))
}
