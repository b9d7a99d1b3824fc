//! Errors raised by the throwing entry points
//!
//! - `ValidationError` wraps a non-empty issue list
//! - `ParseError` adds cancellation of an asynchronous parse

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::types::{format_path, Issue};

/// A failed validation carrying every issue found.
#[derive(Debug, Clone)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

/// Issues grouped by their first path segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedIssues {
    /// Messages of issues at the root
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Wraps an issue list; `None` when the list is empty.
    pub fn new(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self { issues })
        }
    }

    /// Wraps an issue list the engine has already checked is non-empty.
    pub(crate) fn from_nonempty(issues: Vec<Issue>) -> Self {
        debug_assert!(!issues.is_empty());
        Self { issues }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Groups messages by the top-level field they belong to.
    pub fn flatten(&self) -> FlattenedIssues {
        let mut flat = FlattenedIssues::default();
        for issue in &self.issues {
            match issue.path.first() {
                None => flat.form_errors.push(issue.message.clone()),
                Some(seg) => flat
                    .field_errors
                    .entry(seg.to_string())
                    .or_default()
                    .push(issue.message.clone()),
            }
        }
        flat
    }

    /// Messages keyed by full rendered path, in issue order.
    pub fn messages_by_path(&self) -> Vec<(String, String)> {
        self.issues
            .iter()
            .map(|i| (format_path(&i.path), i.message.clone()))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.issues.iter().map(Issue::to_json).collect())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation issue(s): ", self.issues.len())?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Failure of `parse` / `parse_async`.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("validation cancelled")]
    Cancelled,
}

impl ParseError {
    /// Issue list for validation failures; `None` when cancelled.
    pub fn issues(&self) -> Option<&[Issue]> {
        match self {
            ParseError::Invalid(err) => Some(err.issues()),
            ParseError::Cancelled => None,
        }
    }
}
