//! # Pongo Core
//!
//! Bidirectional schema engine. A schema is a tree of [`SchemaNode`]s built
//! from composable [`SchemaType`]s; the same tree *parses* external data into
//! internal values and *serializes* internal values back out.
//!
//! ## Features
//!
//! - **Leaves**: string, int, float64, bool, bytes and datetime, each with
//!   optional per-action casting and bounds
//! - **Combinators**: allOf (with optional chaining), anyOf, oneOf, list and
//!   object
//! - **Path-tracked errors**: every failure is reported with the path to the
//!   offending value, and combinators aggregate instead of stopping early
//! - **Wire format**: versioned JSON encoding of schema trees, decoded against
//!   an explicit [`Registry`] of type ids
//! - **JSON Schema export**: draft-07 documents describing accepted data
//! - **Decorators**: per-action handlers around any schema type
//!
//! ## Example
//!
//! ```rust
//! use pongo_core::types::{IntType, ObjectType, StringType};
//! use pongo_core::{parse, Data, SchemaNode};
//! use serde_json::json;
//!
//! let schema = SchemaNode::new(
//!     ObjectType::new()
//!         .property("name", StringType::new().min_len(1))
//!         .property("age", IntType::new().cast(true).min(0))
//!         .require(["name"]),
//! );
//!
//! let value = parse(&schema, Data::from(json!({"name": "ada", "age": "36"}))).unwrap();
//! assert_eq!(value.get("age"), Some(&Data::Int(36)));
//! ```

pub mod action;
pub mod data;
pub mod decorator;
pub mod error;
pub mod jsonschema;
pub mod node;
pub mod path;
pub mod property;
pub mod registry;
pub mod types;
pub mod wire;

pub use action::Action;
pub use data::{Data, DataKind, Record};
pub use decorator::{Decorated, DecoratorFn};
pub use error::{
    BoxError, ErrorCause, JsonSchemaError, PathError, RegistryError, Result, SchemaElementError,
    SchemaError, WireError,
};
pub use jsonschema::{export_json_schema, JSON_SCHEMA_DRAFT_07};
pub use node::{Metadata, SchemaNode, SchemaType};
pub use path::{DataPointer, Path, PathElement};
pub use property::{ActionFlag, ActionProperty};
pub use registry::{BuiltinType, Registry, SchemaFactory};
pub use wire::{
    decode_schema, decode_schema_value, decode_schema_with, encode_schema, encode_schema_pretty,
    encode_schema_string, SchemaDocument, SCHEMA_VERSION,
};

/// Process `data` with `schema` in direction `action`.
///
/// The root frame of every error path carries the root schema's type id.
pub fn process(schema: &SchemaNode, action: Action, data: impl Into<Data>) -> Result<Data> {
    let pointer = DataPointer::new(data.into(), schema.schema_type_id().unwrap_or_default());
    let result = schema.process(action, &pointer);

    match &result {
        Ok(_) => tracing::debug!(action = %action, "schema accepted data"),
        Err(err) => tracing::debug!(action = %action, errors = err.len(), "schema rejected data"),
    }
    result
}

/// Process `data` in the [`Action::Parse`] direction
pub fn parse(schema: &SchemaNode, data: impl Into<Data>) -> Result<Data> {
    process(schema, Action::Parse, data)
}

/// Process `data` in the [`Action::Serialize`] direction
pub fn serialize(schema: &SchemaNode, data: impl Into<Data>) -> Result<Data> {
    process(schema, Action::Serialize, data)
}
