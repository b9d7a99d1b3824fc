//! CLI command implementations
//!
//! Every command follows the same start-up:
//! 1. Load configuration (defaults when the file is absent)
//! 2. Apply the configured log level
//! 3. Load the schema registry from `schema_dir`

use std::path::Path;

use serde_json::{json, Value as JsonValue};

use crate::config::Config;
use crate::issue::ParseResult;
use crate::loader::SchemaRegistry;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::value::Value;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_json};

/// How a successful command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The input document failed validation
    Invalid,
}

/// Parses arguments and runs the selected command.
pub fn run() -> CliResult<Outcome> {
    run_command(Cli::parse_args().command)
}

pub fn run_command(command: Command) -> CliResult<Outcome> {
    let name = match &command {
        Command::Validate { .. } => "validate",
        Command::List { .. } => "list",
    };

    let outcome = match command {
        Command::Validate {
            schema,
            input,
            config,
        } => validate(&config, &schema, input.as_deref()),
        Command::List { config } => list(&config),
    };

    match &outcome {
        Ok(result) => {
            let status = match result {
                Outcome::Success => "ok",
                Outcome::Invalid => "invalid",
            };
            log_event_with_fields(
                Event::CommandComplete,
                &[("command", name), ("status", status)],
            );
        }
        Err(e) => log_event_with_fields(
            Event::CommandFailed,
            &[("command", name), ("code", e.code_str())],
        ),
    }
    outcome
}

fn open(config_path: &Path) -> CliResult<(Config, SchemaRegistry)> {
    let config = Config::load_or_default(config_path)?;
    Logger::set_level(config.severity()?);

    let mut registry = SchemaRegistry::new(config.schema_path());
    registry.load_all()?;
    Ok((config, registry))
}

/// `validate`: checks one document and prints the response.
pub fn validate(config_path: &Path, schema: &str, input: Option<&Path>) -> CliResult<Outcome> {
    let (config, registry) = open(config_path)?;
    let document = read_input(input)?;
    let (response, outcome) =
        validate_document(&registry, schema, document, config.max_reported_issues)?;
    write_json(&response)?;
    Ok(outcome)
}

/// `list`: prints the registered schema names.
pub fn list(config_path: &Path) -> CliResult<Outcome> {
    let (_, registry) = open(config_path)?;
    write_json(&list_response(&registry))?;
    Ok(Outcome::Success)
}

/// Validates `document` against the named schema, keeping at most
/// `max_issues` issues in the response.
pub fn validate_document(
    registry: &SchemaRegistry,
    schema: &str,
    document: JsonValue,
    max_issues: usize,
) -> CliResult<(JsonValue, Outcome)> {
    let compiled = registry
        .get(schema)
        .ok_or_else(|| CliError::UnknownSchema(schema.to_string()))?;

    let result = compiled.safe_parse(Value::from(document));
    let outcome = if result.is_success() {
        Outcome::Success
    } else {
        Outcome::Invalid
    };
    Ok((render(&result, max_issues), outcome))
}

fn render(result: &ParseResult, max_issues: usize) -> JsonValue {
    let mut response = result.to_json();
    let total = result.issues().len();
    if total > max_issues {
        if let Some(JsonValue::Array(issues)) = response.get_mut("issues") {
            issues.truncate(max_issues);
        }
        response["omitted_issues"] = json!(total - max_issues);
    }
    response
}

pub fn list_response(registry: &SchemaRegistry) -> JsonValue {
    json!({
        "status": "ok",
        "data": registry.names(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn registry_with(documents: &[JsonValue]) -> (TempDir, SchemaRegistry) {
        let dir = TempDir::new().unwrap();
        for (i, document) in documents.iter().enumerate() {
            let path = dir.path().join(format!("{}.schema.json", i));
            fs::write(path, document.to_string()).unwrap();
        }
        let mut registry = SchemaRegistry::new(dir.path());
        registry.load_all().unwrap();
        (dir, registry)
    }

    fn tags_schema() -> JsonValue {
        json!({
            "name": "tags",
            "schema": { "type": "array", "items": { "type": "string", "min": 2 } }
        })
    }

    #[test]
    fn test_validate_ok_response() {
        let (_dir, registry) = registry_with(&[tags_schema()]);
        let (response, outcome) =
            validate_document(&registry, "tags", json!(["ab", "cd"]), 100).unwrap();
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(response, json!({ "status": "ok", "data": ["ab", "cd"] }));
    }

    #[test]
    fn test_validate_invalid_response() {
        let (_dir, registry) = registry_with(&[tags_schema()]);
        let (response, outcome) =
            validate_document(&registry, "tags", json!(["a", "ok", "b"]), 100).unwrap();
        assert_eq!(outcome, Outcome::Invalid);
        assert_eq!(response["status"], "invalid");
        let issues = response["issues"].as_array().unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0]["code"], "too_small");
        assert_eq!(issues[1]["path"], json!([2]));
    }

    #[test]
    fn test_issue_cap() {
        let (_dir, registry) = registry_with(&[tags_schema()]);
        let (response, _) =
            validate_document(&registry, "tags", json!(["a", "b", "c"]), 1).unwrap();
        assert_eq!(response["issues"].as_array().unwrap().len(), 1);
        assert_eq!(response["omitted_issues"], 2);
    }

    #[test]
    fn test_unknown_schema() {
        let (_dir, registry) = registry_with(&[]);
        let err = validate_document(&registry, "user", json!({}), 10).unwrap_err();
        assert!(matches!(err, CliError::UnknownSchema(name) if name == "user"));
    }

    #[test]
    fn test_list_response_sorted() {
        let (_dir, registry) = registry_with(&[
            json!({ "name": "zeta", "schema": { "type": "any" } }),
            json!({ "name": "alpha", "schema": { "type": "any" } }),
        ]);
        assert_eq!(
            list_response(&registry),
            json!({ "status": "ok", "data": ["alpha", "zeta"] })
        );
    }

    #[test]
    fn test_open_with_config() {
        let dir = TempDir::new().unwrap();
        let schemas = dir.path().join("schemas");
        fs::create_dir(&schemas).unwrap();
        fs::write(schemas.join("t.schema.json"), tags_schema().to_string()).unwrap();
        let config_path = dir.path().join("schemakit.json");
        fs::write(
            &config_path,
            json!({ "schema_dir": schemas.display().to_string(), "log_level": "error" })
                .to_string(),
        )
        .unwrap();

        let (config, registry) = open(&config_path).unwrap();
        assert_eq!(config.max_reported_issues, 100);
        assert_eq!(registry.names(), vec!["tags"]);
    }
}
