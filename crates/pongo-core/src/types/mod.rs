//! Builtin schema types
//!
//! Leaves validate and convert primitive values; combinators compose child
//! schema nodes. Every type's wire `$body` is its serde representation.

mod all_of;
mod any_of;
mod boolean;
mod bytes;
mod datetime;
mod float64;
mod int;
mod list;
mod object;
mod one_of;
mod string;

pub use self::all_of::AllOfType;
pub use self::any_of::AnyOfType;
pub use self::boolean::BoolType;
pub use self::bytes::BytesType;
pub use self::datetime::DatetimeType;
pub use self::float64::Float64Type;
pub use self::int::IntType;
pub use self::list::ListType;
pub use self::object::ObjectType;
pub use self::one_of::OneOfType;
pub use self::string::StringType;

use crate::action::Action;
use crate::data::Data;
use crate::error::{ErrorCause, JsonSchemaError, SchemaError};
use crate::node::SchemaNode;
use crate::path::DataPointer;
use serde_json::Value;

static NULL: Data = Data::Null;

/// Current value under the pointer; an empty pointer reads as null
pub(crate) fn current(pointer: &DataPointer) -> &Data {
    pointer.get().unwrap_or(&NULL)
}

pub(crate) fn mismatch(pointer: &DataPointer, expected: &'static str) -> SchemaError {
    SchemaError::with_error(
        pointer.path(),
        ErrorCause::TypeMismatch {
            expected,
            found: current(pointer).kind(),
        },
    )
}

pub(crate) fn cast_failed(pointer: &DataPointer, target: &'static str, reason: impl ToString) -> SchemaError {
    SchemaError::with_error(
        pointer.path(),
        ErrorCause::CastFailed {
            target,
            found: current(pointer).kind(),
            reason: reason.to_string(),
        },
    )
}

/// Truncate a float to an integer, or `None` when it is not finite or does
/// not fit in an `i64`.
pub(crate) fn truncate_to_i64(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

pub(crate) fn check_len(
    pointer: &DataPointer,
    actual: usize,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<(), SchemaError> {
    if let Some(min) = min.filter(|&min| actual < min) {
        return Err(SchemaError::with_error(
            pointer.path(),
            ErrorCause::TooShort { actual, min },
        ));
    }
    if let Some(max) = max.filter(|&max| actual > max) {
        return Err(SchemaError::with_error(
            pointer.path(),
            ErrorCause::TooLong { actual, max },
        ));
    }
    Ok(())
}

pub(crate) fn check_bounds<T: PartialOrd + ToString>(
    pointer: &DataPointer,
    actual: &T,
    min: Option<&T>,
    max: Option<&T>,
) -> Result<(), SchemaError> {
    if let Some(min) = min.filter(|min| actual < *min) {
        return Err(SchemaError::with_error(
            pointer.path(),
            ErrorCause::BelowMinimum {
                actual: actual.to_string(),
                min: min.to_string(),
            },
        ));
    }
    if let Some(max) = max.filter(|max| actual > *max) {
        return Err(SchemaError::with_error(
            pointer.path(),
            ErrorCause::AboveMaximum {
                actual: actual.to_string(),
                max: max.to_string(),
            },
        ));
    }
    Ok(())
}

/// JSON Schema fragments of the children that have one
pub(crate) fn child_fragments(children: &[SchemaNode], action: Action) -> Result<Vec<Value>, JsonSchemaError> {
    children
        .iter()
        .filter_map(|child| child.schema_type()?.json_schema(action))
        .collect()
}

/// Insert `value` under `key` when present
pub(crate) fn insert_opt<T: Into<Value>>(
    object: &mut serde_json::Map<String, Value>,
    key: &str,
    value: Option<T>,
) {
    if let Some(value) = value {
        object.insert(key.to_string(), value.into());
    }
}
