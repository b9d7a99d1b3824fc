//! Outcome of a non-throwing parse

use super::errors::ValidationError;
use super::types::Issue;
use crate::value::Value;

/// Success with the (possibly transformed) output, or failure with at
/// least one issue.
#[derive(Debug, Clone)]
pub enum ParseResult {
    Success(Value),
    Failure(ValidationError),
}

impl ParseResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseResult::Success(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            ParseResult::Success(v) => Some(v),
            ParseResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ParseResult::Success(_) => None,
            ParseResult::Failure(e) => Some(e),
        }
    }

    /// Issues of a failure; empty on success.
    pub fn issues(&self) -> &[Issue] {
        match self {
            ParseResult::Success(_) => &[],
            ParseResult::Failure(e) => e.issues(),
        }
    }

    pub fn into_result(self) -> Result<Value, ValidationError> {
        match self {
            ParseResult::Success(v) => Ok(v),
            ParseResult::Failure(e) => Err(e),
        }
    }

    /// Renders `{"status":"ok","data":...}` or `{"status":"invalid","issues":[...]}`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ParseResult::Success(v) => serde_json::json!({
                "status": "ok",
                "data": v.to_json(),
            }),
            ParseResult::Failure(e) => serde_json::json!({
                "status": "invalid",
                "issues": e.to_json(),
            }),
        }
    }
}

impl From<Result<Value, ValidationError>> for ParseResult {
    fn from(result: Result<Value, ValidationError>) -> Self {
        match result {
            Ok(v) => ParseResult::Success(v),
            Err(e) => ParseResult::Failure(e),
        }
    }
}
