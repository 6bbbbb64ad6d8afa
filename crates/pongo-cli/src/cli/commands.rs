//! CLI command definitions for pongo
//!
//! Clap-based commands for processing data files with schema documents,
//! checking schema documents, exporting them as JSON Schema and listing the
//! registered schema types.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::output::{render_json_schema, CheckOutput, OutputFormat, TypesOutput, ValidationOutput};
use super::ExitCode;
use crate::config::CliConfig;
use crate::error::CliError;
use pongo_core::{
    decode_schema_value, encode_schema, export_json_schema, process, Action, Data, Registry,
    SchemaDocument, SCHEMA_VERSION,
};

/// Pongo schema CLI
///
/// Parse or serialize data files with versioned schema documents.
#[derive(Parser, Debug)]
#[command(name = "pongo")]
#[command(about = "Pongo - Process data with bidirectional schemas", long_about = None)]
#[command(version)]
pub struct PongoCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML settings file
    #[arg(long, env = "PONGO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: PongoCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum PongoCommands {
    /// Process a data file with a schema document
    ///
    /// Prints the processed value, or every error with the path it occurred at.
    Validate {
        /// Path to the schema document
        #[arg(short, long)]
        schema: PathBuf,

        /// Path to the data file (json, yaml, yml or toml)
        #[arg(short, long)]
        data: PathBuf,

        /// Direction to process the data in
        #[arg(short, long, value_enum)]
        action: Option<ActionArg>,

        /// Output format for results
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Decode a schema document and summarize it
    ///
    /// Also re-encodes the decoded tree to confirm it survives a round trip.
    Check {
        /// Path to the schema document
        #[arg(short, long)]
        schema: PathBuf,

        /// Output format for results
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Export a schema document as a JSON Schema (draft-07) document
    Export {
        /// Path to the schema document
        #[arg(short, long)]
        schema: PathBuf,

        /// Direction whose accepted data is described
        #[arg(short, long, value_enum)]
        action: Option<ActionArg>,

        /// Output format (json or yaml)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List the registered schema types
    Types {
        /// Output format for results
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// Schema action selectable on the command line
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionArg {
    /// External data to internal value
    #[default]
    Parse,
    /// Internal value to external data
    Serialize,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Parse => Action::Parse,
            ActionArg::Serialize => Action::Serialize,
        }
    }
}

/// Execute the validate command
pub fn execute_validate(
    schema: &Path,
    data: &Path,
    action: Option<ActionArg>,
    format: Option<OutputFormat>,
    config: &CliConfig,
) -> Result<ExitCode, CliError> {
    let document = load_schema(schema, config)?;

    let data_content = read_file(data, "data")?;
    let data_value = parse_data_file(data, &data_content)?;

    let action = Action::from(action.unwrap_or(config.default_action));
    let result = process(&document.schema, action, Data::from(data_value));

    tracing::info!(
        schema = %schema.display(),
        data = %data.display(),
        action = %action,
        valid = result.is_ok(),
        "processed data file"
    );

    let output = ValidationOutput::from_result(action, &result);
    output.render(format.unwrap_or(config.output))?;

    Ok(ExitCode::from_validation_result(result.is_err()))
}

/// Execute the check command
pub fn execute_check(
    schema: &Path,
    format: Option<OutputFormat>,
    config: &CliConfig,
) -> Result<ExitCode, CliError> {
    let document = load_schema(schema, config)?;

    let encoded = encode_schema(&document.schema, document.metadata.as_ref())?;
    let round_trip = decode_schema_value(encoded, &Registry::builtin())? == document;

    let output = CheckOutput::from_document(&document, round_trip);
    output.render(format.unwrap_or(config.output))?;

    if round_trip {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::SchemaError)
    }
}

/// Execute the export command
pub fn execute_export(
    schema: &Path,
    action: Option<ActionArg>,
    format: Option<OutputFormat>,
    config: &CliConfig,
) -> Result<ExitCode, CliError> {
    let document = load_schema(schema, config)?;
    let action = Action::from(action.unwrap_or(config.default_action));

    let json_schema = export_json_schema(&document.schema, action)?;
    render_json_schema(&json_schema, format.unwrap_or(config.output))?;

    Ok(ExitCode::Success)
}

/// Execute the types command
pub fn execute_types(format: Option<OutputFormat>, config: &CliConfig) -> Result<ExitCode, CliError> {
    let registry = Registry::builtin();
    let output = TypesOutput {
        types: registry.ids().into_iter().map(String::from).collect(),
    };
    output.render(format.unwrap_or(config.output))?;
    Ok(ExitCode::Success)
}

fn read_file(path: &Path, kind: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::file_error(format!(
            "Failed to read {} file '{}': {}",
            kind,
            path.display(),
            e
        ))
    })
}

/// Read and decode a schema document with the builtin registry
pub fn load_schema(path: &Path, config: &CliConfig) -> Result<SchemaDocument, CliError> {
    let content = read_file(path, "schema")?;
    let mut value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| CliError::schema_error(format!("Invalid JSON in '{}': {}", path.display(), e)))?;

    if !config.strict_version && is_bare_node(&value) {
        tracing::warn!(path = %path.display(), "schema has no envelope, assuming version {}", SCHEMA_VERSION);
        value = serde_json::json!({ "$version": SCHEMA_VERSION, "$body": value });
    }

    let document = decode_schema_value(value, &Registry::builtin())?;
    tracing::debug!(
        path = %path.display(),
        root = document.schema.schema_type_id().unwrap_or_default(),
        "loaded schema document"
    );
    Ok(document)
}

fn is_bare_node(value: &serde_json::Value) -> bool {
    value.get("$type").is_some() && value.get("$version").is_none()
}

/// Parse a data file based on its extension
pub fn parse_data_file(path: &Path, content: &str) -> Result<serde_json::Value, CliError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => serde_json::from_str(content)
            .map_err(|e| CliError::parse_error(format!("Invalid JSON: {}", e))),
        "yaml" | "yml" => serde_yaml::from_str(content)
            .map_err(|e| CliError::parse_error(format!("Invalid YAML: {}", e))),
        "toml" => {
            let toml_value: toml::Value = toml::from_str(content)
                .map_err(|e| CliError::parse_error(format!("Invalid TOML: {}", e)))?;
            serde_json::to_value(toml_value)
                .map_err(|e| CliError::parse_error(format!("Conversion error: {}", e)))
        }
        _ => Err(CliError::invalid_input(format!(
            "Unsupported file format: {}. Supported formats: json, yaml, yml, toml",
            extension
        ))),
    }
}
