//! Output formatting for the pongo CLI
//!
//! Renders command results as JSON, YAML or a colored human-readable table.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::error::CliError;
use pongo_core::{Action, Data, SchemaDocument, SchemaError, SchemaNode};

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Print any serializable value as JSON or YAML
fn render_serialized<T: Serialize>(value: &T, format: OutputFormat) -> Result<(), CliError> {
    let text = match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|e| CliError::SerializationError(e.to_string()))?,
        _ => serde_json::to_string_pretty(value)
            .map_err(|e| CliError::SerializationError(e.to_string()))?,
    };
    println!("{}", text);
    Ok(())
}

/// Result of processing a data file with a schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutput {
    /// Whether the schema accepted the data
    pub valid: bool,
    /// Direction the data was processed in
    pub action: String,
    /// Number of error entries
    pub error_count: usize,
    /// Every error entry, in the order they were found
    pub errors: Vec<ErrorOutput>,
    /// Processed value, present when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    /// Summary message
    pub summary: String,
}

/// One error entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Path to the offending value
    pub path: String,
    /// Human-readable cause
    pub message: String,
}

impl ValidationOutput {
    pub fn from_result(action: Action, result: &Result<Data, SchemaError>) -> Self {
        match result {
            Ok(value) => Self {
                valid: true,
                action: action.to_string(),
                error_count: 0,
                errors: Vec::new(),
                output: Some(value.to_json()),
                summary: "Data is valid".to_string(),
            },
            Err(err) => {
                let errors: Vec<ErrorOutput> = err
                    .iter()
                    .map(|e| ErrorOutput {
                        path: e.path().to_string(),
                        message: e.cause().to_string(),
                    })
                    .collect();
                Self {
                    valid: false,
                    action: action.to_string(),
                    error_count: errors.len(),
                    summary: format!("Data has {} error(s)", errors.len()),
                    errors,
                    output: None,
                }
            }
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<(), CliError> {
        match format {
            OutputFormat::Table => self.render_table(),
            _ => render_serialized(self, format),
        }
    }

    fn render_table(&self) -> Result<(), CliError> {
        let mut stdout = io::stdout();

        writeln!(stdout)?;
        writeln!(stdout, "{}", format!("Results ({})", self.action).cyan().bold())?;
        writeln!(stdout, "{}", "=".repeat(60))?;

        for error in &self.errors {
            writeln!(stdout, "  {} {}", "✗".red().bold(), error.path.bold())?;
            writeln!(stdout, "    {}", error.message)?;
        }

        if let Some(output) = &self.output {
            let pretty = serde_json::to_string_pretty(output)
                .map_err(|e| CliError::SerializationError(e.to_string()))?;
            writeln!(stdout, "{}", "Output:".cyan())?;
            writeln!(stdout, "{}", pretty)?;
        }

        writeln!(stdout, "{}", "-".repeat(60))?;
        if self.valid {
            writeln!(stdout, "{} {}", "✓".green().bold(), self.summary.green())?;
        } else {
            writeln!(stdout, "{} {}", "✗".red().bold(), self.summary.red())?;
        }
        Ok(())
    }
}

/// Result of checking a schema document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutput {
    /// Type id of the root node
    pub root_type: String,
    /// Distinct type ids used anywhere in the tree, sorted
    pub type_ids: Vec<String>,
    /// Total number of nodes
    pub node_count: usize,
    /// Deepest nesting level, the root being 1
    pub depth: usize,
    /// Whether re-encoding and decoding again yields the same tree
    pub round_trip: bool,
}

impl CheckOutput {
    pub fn from_document(document: &SchemaDocument, round_trip: bool) -> Self {
        let mut type_ids = BTreeSet::new();
        let (node_count, depth) = walk(&document.schema, &mut type_ids);

        Self {
            root_type: document
                .schema
                .schema_type_id()
                .unwrap_or_default()
                .to_string(),
            type_ids: type_ids.into_iter().collect(),
            node_count,
            depth,
            round_trip,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<(), CliError> {
        if format != OutputFormat::Table {
            return render_serialized(self, format);
        }

        let mut stdout = io::stdout();
        writeln!(stdout, "{}", "Schema Check".cyan().bold())?;
        writeln!(stdout, "  Root type:  {}", self.root_type)?;
        writeln!(stdout, "  Types used: {}", self.type_ids.join(", "))?;
        writeln!(stdout, "  Nodes:      {}", self.node_count)?;
        writeln!(stdout, "  Depth:      {}", self.depth)?;
        let round_trip = if self.round_trip {
            "ok".green()
        } else {
            "mismatch".red()
        };
        writeln!(stdout, "  Round trip: {}", round_trip)?;
        Ok(())
    }
}

/// Collect type ids, returning (node count, depth)
fn walk(node: &SchemaNode, type_ids: &mut BTreeSet<String>) -> (usize, usize) {
    if let Some(id) = node.schema_type_id() {
        type_ids.insert(id.to_string());
    }
    node.children()
        .into_iter()
        .map(|child| walk(child, type_ids))
        .fold((1, 1), |(count, depth), (child_count, child_depth)| {
            (count + child_count, depth.max(child_depth + 1))
        })
}

/// Registered schema types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypesOutput {
    pub types: Vec<String>,
}

impl TypesOutput {
    pub fn render(&self, format: OutputFormat) -> Result<(), CliError> {
        if format != OutputFormat::Table {
            return render_serialized(self, format);
        }

        println!("{}", "Registered schema types".cyan().bold());
        for id in &self.types {
            println!("  {} {}", "-".blue(), id);
        }
        Ok(())
    }
}

/// Print a JSON Schema document; tables have no meaning here so they print JSON
pub fn render_json_schema(document: &serde_json::Value, format: OutputFormat) -> Result<(), CliError> {
    render_serialized(document, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pongo_core::types::{IntType, ListType, ObjectType, StringType};
    use pongo_core::{parse, Registry};
    use serde_json::json;

    #[test]
    fn test_validation_output_success() {
        let schema = SchemaNode::new(IntType::new().cast(true));
        let output = ValidationOutput::from_result(Action::Parse, &parse(&schema, "4"));
        assert!(output.valid);
        assert_eq!(output.output, Some(json!(4)));
        assert_eq!(output.action, "PARSE");
    }

    #[test]
    fn test_validation_output_errors() {
        let schema = SchemaNode::new(ListType::new(IntType::new()));
        let result = parse(&schema, Data::from(json!([1, "a", "b"])));
        let output = ValidationOutput::from_result(Action::Parse, &result);

        assert!(!output.valid);
        assert_eq!(output.error_count, 2);
        assert_eq!(output.errors[0].path, ".<list>.[1]<int>");
        assert_eq!(output.summary, "Data has 2 error(s)");
        assert!(output.output.is_none());
    }

    #[test]
    fn test_check_output_walks_tree() {
        let schema = SchemaNode::new(
            ObjectType::new()
                .property("a", ListType::new(StringType::new()))
                .property("b", IntType::new()),
        );
        let document = SchemaDocument {
            schema,
            metadata: None,
        };

        let output = CheckOutput::from_document(&document, true);
        assert_eq!(output.root_type, "object");
        assert_eq!(output.type_ids, vec!["int", "list", "object", "string"]);
        assert_eq!(output.node_count, 4);
        assert_eq!(output.depth, 3);
    }

    #[test]
    fn test_types_output_json() {
        let output = TypesOutput {
            types: Registry::builtin().ids().into_iter().map(String::from).collect(),
        };
        assert!(output.render(OutputFormat::Json).is_ok());
        assert_eq!(output.types.len(), 11);
    }
}
