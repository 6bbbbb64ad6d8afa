//! Error types for the pongo CLI
//!
//! Classifies failures so they map onto exit codes.

use pongo_core::{JsonSchemaError, WireError};
use thiserror::Error;

/// Main error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Data file parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Schema document could not be decoded or exported
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Output rendering error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CliError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CliError::InvalidInput(msg.into())
    }

    pub fn file_error(msg: impl Into<String>) -> Self {
        CliError::FileError(msg.into())
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        CliError::ParseError(msg.into())
    }

    pub fn schema_error(msg: impl Into<String>) -> Self {
        CliError::SchemaError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CliError::InvalidInput(_)
                | CliError::FileError(_)
                | CliError::ParseError(_)
                | CliError::SchemaError(_)
        )
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::FileError(err.to_string())
    }
}

impl From<WireError> for CliError {
    fn from(err: WireError) -> Self {
        CliError::SchemaError(err.to_string())
    }
}

impl From<JsonSchemaError> for CliError {
    fn from(err: JsonSchemaError) -> Self {
        CliError::SchemaError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        assert!(CliError::invalid_input("x").is_user_error());
        assert!(CliError::schema_error("x").is_user_error());
        assert!(!CliError::SerializationError("x".into()).is_user_error());
        assert!(!CliError::InternalError("x".into()).is_user_error());
    }

    #[test]
    fn test_wire_errors_are_schema_errors() {
        let err = CliError::from(WireError::MissingBody);
        assert!(matches!(err, CliError::SchemaError(_)));
        assert_eq!(
            err.to_string(),
            "Schema error: expected schema body, no schema found"
        );
    }
}
