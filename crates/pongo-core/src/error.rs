//! Error types for schema processing, wire decoding and registries

use crate::action::Action;
use crate::data::DataKind;
use crate::path::Path;
use std::fmt;
use thiserror::Error;

/// Boxed error accepted by [`SchemaError::cast`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for schema processing
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

/// A single reason why processing failed at some path
#[derive(Error, Debug)]
pub enum ErrorCause {
    #[error("no schema type set on schema node")]
    NoSchemaType,

    #[error("list schema has no item schema")]
    MissingItemSchema,

    #[error("schema type {schema_type} does not support action {action}")]
    InvalidAction { action: Action, schema_type: String },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: DataKind,
    },

    #[error("invalid format {format:?}: {reason}")]
    InvalidFormat { format: String, reason: String },

    #[error("cannot cast {found} to {target}: {reason}")]
    CastFailed {
        target: &'static str,
        found: DataKind,
        reason: String,
    },

    #[error("length {actual} is below the minimum length {min}")]
    TooShort { actual: usize, min: usize },

    #[error("length {actual} is above the maximum length {max}")]
    TooLong { actual: usize, max: usize },

    #[error("value {actual} is below the minimum {min}")]
    BelowMinimum { actual: String, min: String },

    #[error("value {actual} is above the maximum {max}")]
    AboveMaximum { actual: String, max: String },

    #[error("expected a list, found {found}")]
    NotAList { found: DataKind },

    #[error("expected an object, found {found}")]
    NotAnObject { found: DataKind },

    #[error("missing required keys: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("unknown key {0}")]
    UnknownKey(String),

    #[error("no schema matched")]
    NoMatch,

    #[error("{matches} schemas matched, expected exactly one")]
    AmbiguousMatch { matches: usize },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Other(BoxError),
}

/// Errors from mutating a [`Path`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path has no element to {0}")]
    Empty(&'static str),
}

/// A cause paired with the path it occurred at
#[derive(Debug)]
pub struct SchemaElementError {
    path: Path,
    cause: ErrorCause,
}

impl SchemaElementError {
    pub fn new(path: Path, cause: ErrorCause) -> Self {
        Self { path, cause }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cause(&self) -> &ErrorCause {
        &self.cause
    }

    pub fn into_parts(self) -> (Path, ErrorCause) {
        (self.path, self.cause)
    }
}

impl fmt::Display for SchemaElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.cause)
    }
}

/// Aggregate of every failure found while processing data.
///
/// Combinators collect their children's failures here instead of stopping at
/// the first one, so a single run reports everything that is wrong.
#[derive(Debug, Default)]
pub struct SchemaError {
    errors: Vec<SchemaElementError>,
}

impl SchemaError {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregate holding a single entry
    pub fn with_error(path: &Path, cause: ErrorCause) -> Self {
        Self::new().append(path, cause)
    }

    /// Add an entry
    pub fn append(mut self, path: &Path, cause: ErrorCause) -> Self {
        self.errors.push(SchemaElementError::new(path.clone(), cause));
        self
    }

    /// Add every entry of `other`, keeping their order
    pub fn merge(mut self, other: SchemaError) -> Self {
        self.errors.extend(other.errors);
        self
    }

    /// Normalize any error into an aggregate.
    ///
    /// An aggregate is returned unchanged, a bare [`ErrorCause`] becomes one
    /// entry at `path` and anything else is wrapped as [`ErrorCause::Other`].
    pub fn cast(path: &Path, error: BoxError) -> Self {
        let error = match error.downcast::<SchemaError>() {
            Ok(aggregate) => return *aggregate,
            Err(error) => error,
        };
        match error.downcast::<ErrorCause>() {
            Ok(cause) => Self::with_error(path, *cause),
            Err(error) => Self::with_error(path, ErrorCause::Other(error)),
        }
    }

    /// Merge any error after normalizing it with [`SchemaError::cast`]
    pub fn merge_with_cast(self, path: &Path, error: BoxError) -> Self {
        self.merge(Self::cast(path, error))
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[SchemaElementError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaElementError> {
        self.errors.iter()
    }

    /// Iterate over the causes without their paths
    pub fn causes(&self) -> impl Iterator<Item = &ErrorCause> {
        self.errors.iter().map(SchemaElementError::cause)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema processing failed with {} error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

impl IntoIterator for SchemaError {
    type Item = SchemaElementError;
    type IntoIter = std::vec::IntoIter<SchemaElementError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a SchemaError {
    type Item = &'a SchemaElementError;
    type IntoIter = std::slice::Iter<'a, SchemaElementError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Errors from encoding or decoding the schema wire format
#[derive(Error, Debug)]
pub enum WireError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed schema: {0}")]
    Malformed(String),

    #[error("expected schema version \"{expected}\", no version found")]
    MissingVersion { expected: &'static str },

    #[error("expected schema version \"{expected}\", found {found}")]
    UnsupportedVersion { expected: &'static str, found: String },

    #[error("expected schema body, no schema found")]
    MissingBody,

    #[error("schema node has no $type")]
    MissingType,

    #[error("schema type {0} not found in registry")]
    UnknownType(String),

    #[error("invalid body for schema type {type_id}: {source}")]
    InvalidBody {
        type_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode a schema node with no schema type set")]
    NoSchemaType,
}

/// Errors from mutating a [`crate::Registry`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("schema type {0} is already registered")]
    DuplicateTypeId(String),
}

/// Errors from exporting a JSON Schema document
#[derive(Error, Debug)]
pub enum JsonSchemaError {
    #[error("schema type {schema_type} cannot be exported for action {action}")]
    InvalidAction { action: Action, schema_type: String },

    #[error("schema type {schema_type} cannot be exported: {reason}")]
    NotExportable { schema_type: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Data;
    use crate::path::DataPointer;

    fn root_path() -> Path {
        DataPointer::new(Data::Int(1), "int").path().clone()
    }

    #[test]
    fn test_merge_keeps_order() {
        let path = root_path();
        let first = SchemaError::with_error(&path, ErrorCause::NoMatch);
        let second = SchemaError::new()
            .append(&path, ErrorCause::UnknownKey("a".into()))
            .append(&path, ErrorCause::UnknownKey("b".into()));

        let merged = first.merge(second);
        assert_eq!(merged.len(), 3);
        assert!(matches!(merged.errors()[0].cause(), ErrorCause::NoMatch));
        assert!(matches!(merged.errors()[2].cause(), ErrorCause::UnknownKey(k) if k == "b"));
    }

    #[test]
    fn test_cast_unwraps_aggregate() {
        let path = root_path();
        let aggregate = SchemaError::new()
            .append(&path, ErrorCause::NoMatch)
            .append(&path, ErrorCause::MissingItemSchema);

        let cast = SchemaError::cast(&path, Box::new(aggregate));
        assert_eq!(cast.len(), 2);
    }

    #[test]
    fn test_cast_wraps_plain_errors() {
        let path = root_path();
        let cast = SchemaError::cast(&path, Box::new(ErrorCause::NoMatch));
        assert!(matches!(cast.errors()[0].cause(), ErrorCause::NoMatch));

        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let cast = SchemaError::new().merge_with_cast(&path, Box::new(io));
        assert_eq!(cast.len(), 1);
        assert!(matches!(cast.errors()[0].cause(), ErrorCause::Other(_)));
        assert!(cast.to_string().contains("boom"));
    }

    #[test]
    fn test_display_lists_paths() {
        let pointer = DataPointer::new(Data::Null, "object");
        let child = pointer.push("name", Data::Int(3), "string");
        let err = SchemaError::with_error(
            child.path(),
            ErrorCause::TypeMismatch {
                expected: "string",
                found: DataKind::Int,
            },
        );

        let rendered = err.to_string();
        assert!(rendered.contains("1 error(s)"));
        assert!(rendered.contains(".name<string>: expected string, found int"));
    }
}
