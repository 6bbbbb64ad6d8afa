//! CLI module for pongo
//!
//! Command-line interface for processing data files with schema documents,
//! checking and exporting schema documents, and listing schema types.

pub mod commands;
pub mod output;

pub use commands::{ActionArg, PongoCli, PongoCommands};
pub use output::{OutputFormat, ValidationOutput};

use crate::config::CliConfig;
use crate::error::CliError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution, data accepted
    Success = 0,
    /// The schema rejected the data
    ValidationError = 1,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Schema document could not be decoded or exported
    SchemaError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from a processing result
    pub fn from_validation_result(has_errors: bool) -> Self {
        if has_errors {
            ExitCode::ValidationError
        } else {
            ExitCode::Success
        }
    }
}

impl From<&CliError> for ExitCode {
    fn from(err: &CliError) -> Self {
        match err {
            CliError::InvalidInput(_) | CliError::ParseError(_) => ExitCode::InvalidInput,
            CliError::FileError(_) => ExitCode::FileError,
            CliError::SchemaError(_) => ExitCode::SchemaError,
            CliError::SerializationError(_) | CliError::InternalError(_) => ExitCode::InternalError,
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: PongoCli) -> Result<ExitCode, CliError> {
    let config = CliConfig::load(cli.config.as_deref())
        .map_err(|e| CliError::invalid_input(format!("{:#}", e)))?;

    match cli.command {
        PongoCommands::Validate {
            schema,
            data,
            action,
            format,
        } => commands::execute_validate(&schema, &data, action, format, &config),
        PongoCommands::Check { schema, format } => {
            commands::execute_check(&schema, format, &config)
        }
        PongoCommands::Export {
            schema,
            action,
            format,
        } => commands::execute_export(&schema, action, format, &config),
        PongoCommands::Types { format } => commands::execute_types(format, &config),
    }
}
