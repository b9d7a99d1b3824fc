//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit status.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::loader::LoaderError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Loader(#[from] LoaderError),

    #[error("unknown schema '{0}'")]
    UnknownSchema(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty input")]
    EmptyInput,
}

impl CliError {
    /// Stable error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            Self::Config(_) => "SCHEMAKIT_CLI_CONFIG_ERROR",
            Self::Loader(e) => e.code(),
            Self::UnknownSchema(_) => "SCHEMAKIT_CLI_UNKNOWN_SCHEMA",
            Self::Io(_) | Self::EmptyInput => "SCHEMAKIT_CLI_IO_ERROR",
            Self::Json(_) => "SCHEMAKIT_CLI_INPUT_MALFORMED",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            CliError::UnknownSchema("x".into()).code_str(),
            "SCHEMAKIT_CLI_UNKNOWN_SCHEMA"
        );
        assert_eq!(CliError::EmptyInput.code_str(), "SCHEMAKIT_CLI_IO_ERROR");
        let loader = CliError::from(LoaderError::Duplicate("user".into()));
        assert_eq!(loader.code_str(), "SCHEMA_DUPLICATE");
    }

    #[test]
    fn test_display_names_schema() {
        let err = CliError::UnknownSchema("order".into());
        assert_eq!(err.to_string(), "unknown schema 'order'");
    }
}
