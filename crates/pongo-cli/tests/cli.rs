//! End-to-end tests for the pongo CLI commands

use clap::Parser;
use pongo_cli::cli::run;
use pongo_cli::{ExitCode, PongoCli};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const USER_SCHEMA: &str = r#"{
    "$version": "1.0",
    "$body": {
        "$type": "object",
        "$body": {
            "properties": {
                "name": {"$type": "string", "$body": {"minLen": 1}},
                "age": {"$type": "int", "$body": {"cast": true, "min": 0}}
            },
            "required": ["name"]
        },
        "$metadata": {"$id": "https://example.com/user.json"}
    }
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run_args(args: &[&str]) -> ExitCode {
    let mut argv = vec!["pongo"];
    argv.extend_from_slice(args);
    let cli = PongoCli::parse_from(argv);
    match run(cli) {
        Ok(code) => code,
        Err(e) => ExitCode::from(&e),
    }
}

#[test]
fn test_validate_accepts_valid_data() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user.schema.json", USER_SCHEMA);
    let data = write(&dir, "user.yaml", "name: ada\nage: \"36\"\n");

    let code = run_args(&[
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        "--data",
        data.to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_validate_rejects_invalid_data() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user.schema.json", USER_SCHEMA);
    let data = write(&dir, "user.json", r#"{"name": "", "age": -1, "extra": true}"#);

    let code = run_args(&[
        "validate",
        "-s",
        schema.to_str().unwrap(),
        "-d",
        data.to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert_eq!(code, ExitCode::ValidationError);
}

#[test]
fn test_validate_toml_data_with_serialize() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user.schema.json", USER_SCHEMA);
    let data = write(&dir, "user.toml", "name = \"ada\"\nage = 36\n");

    let code = run_args(&[
        "validate",
        "-s",
        schema.to_str().unwrap(),
        "-d",
        data.to_str().unwrap(),
        "--action",
        "serialize",
        "--format",
        "yaml",
    ]);
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_missing_files() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user.schema.json", USER_SCHEMA);
    let missing = dir.path().join("missing.json");

    let code = run_args(&[
        "validate",
        "-s",
        schema.to_str().unwrap(),
        "-d",
        missing.to_str().unwrap(),
    ]);
    assert_eq!(code, ExitCode::FileError);

    let code = run_args(&["check", "-s", missing.to_str().unwrap()]);
    assert_eq!(code, ExitCode::FileError);
}

#[test]
fn test_unsupported_version_is_schema_error() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        &dir,
        "old.schema.json",
        r#"{"$version": "0.9", "$body": {"$type": "int"}}"#,
    );

    let code = run_args(&["check", "-s", schema.to_str().unwrap(), "--format", "json"]);
    assert_eq!(code, ExitCode::SchemaError);
}

#[test]
fn test_bare_node_depends_on_strict_version() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "bare.schema.json", r#"{"$type": "int"}"#);
    let data = write(&dir, "n.json", "4");
    let settings = write(&dir, "pongo.toml", "strict_version = false\n");

    let strict = run_args(&[
        "validate",
        "-s",
        schema.to_str().unwrap(),
        "-d",
        data.to_str().unwrap(),
    ]);
    assert_eq!(strict, ExitCode::SchemaError);

    let lenient = run_args(&[
        "--config",
        settings.to_str().unwrap(),
        "validate",
        "-s",
        schema.to_str().unwrap(),
        "-d",
        data.to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert_eq!(lenient, ExitCode::Success);
}

#[test]
fn test_invalid_settings_file() {
    let dir = TempDir::new().unwrap();
    let settings = write(&dir, "pongo.toml", "colour = true\n");

    let code = run_args(&["--config", settings.to_str().unwrap(), "types"]);
    assert_eq!(code, ExitCode::InvalidInput);
}

#[test]
fn test_check_export_and_types() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user.schema.json", USER_SCHEMA);
    let path = schema.to_str().unwrap();

    assert_eq!(
        run_args(&["check", "-s", path, "--format", "json"]),
        ExitCode::Success
    );
    assert_eq!(
        run_args(&["export", "-s", path, "--action", "parse", "--format", "json"]),
        ExitCode::Success
    );
    assert_eq!(run_args(&["types", "--format", "yaml"]), ExitCode::Success);
}

#[test]
fn test_export_rejects_unexportable_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        &dir,
        "dt.schema.json",
        r#"{"$version": "1.0", "$body": {"$type": "datetime"}}"#,
    );

    let code = run_args(&["export", "-s", schema.to_str().unwrap(), "--format", "json"]);
    assert_eq!(code, ExitCode::SchemaError);
}
