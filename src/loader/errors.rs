//! Loader errors
//!
//! A registry that fails to load is never partially populated: documents
//! from a directory are registered only after every one of them compiled.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed schema document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema '{0}' is already registered")]
    Duplicate(String),

    #[error("schema '{schema}' references unknown schema '{target}'")]
    UnknownReference { schema: String, target: String },

    #[error("schema '{schema}' is invalid: {reason}")]
    InvalidDocument { schema: String, reason: String },
}

impl LoaderError {
    /// Stable code, reported by the command line
    pub fn code(&self) -> &'static str {
        match self {
            LoaderError::Io { .. } => "SCHEMA_IO_ERROR",
            LoaderError::Json { .. } => "SCHEMA_MALFORMED",
            LoaderError::Duplicate(_) => "SCHEMA_DUPLICATE",
            LoaderError::UnknownReference { .. } => "SCHEMA_UNKNOWN_REFERENCE",
            LoaderError::InvalidDocument { .. } => "SCHEMA_INVALID",
        }
    }

    pub(crate) fn invalid(schema: &str, reason: impl Into<String>) -> Self {
        LoaderError::InvalidDocument {
            schema: schema.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(LoaderError::Duplicate("user".into()).code(), "SCHEMA_DUPLICATE");
        let err = LoaderError::UnknownReference {
            schema: "order".into(),
            target: "item".into(),
        };
        assert_eq!(err.code(), "SCHEMA_UNKNOWN_REFERENCE");
        assert_eq!(
            err.to_string(),
            "schema 'order' references unknown schema 'item'"
        );
    }
}
