//! Issue vocabulary
//!
//! An `Issue` is one validation failure: where (path), what (kind with
//! its context payload) and a human-readable message. Issues are plain
//! data; the only behavior is construction and path extension.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use super::messages::default_message;
use crate::value::{format_number, Value, ValueKind};

/// One step from the root to the failing location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{}", k),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl PathSegment {
    fn to_json(&self) -> serde_json::Value {
        match self {
            PathSegment::Key(k) => serde_json::Value::String(k.clone()),
            PathSegment::Index(i) => serde_json::Value::from(*i),
        }
    }
}

/// Renders a path as `a.b[0].c`, or `(root)` when empty.
pub fn format_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "(root)".to_string();
    }
    let mut out = String::new();
    for seg in path {
        match seg {
            PathSegment::Key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
            PathSegment::Index(i) => {
                out.push_str(&format!("[{}]", i));
            }
        }
    }
    out
}

/// What a size bound applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeOrigin {
    String,
    Number,
    BigInt,
    Array,
    Set,
    Date,
}

impl SizeOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeOrigin::String => "string",
            SizeOrigin::Number => "number",
            SizeOrigin::BigInt => "bigint",
            SizeOrigin::Array => "array",
            SizeOrigin::Set => "set",
            SizeOrigin::Date => "date",
        }
    }
}

/// Bound value carried by size and multiple-of issues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Number(f64),
    BigInt(i128),
    Date(DateTime<Utc>),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Number(n) => write!(f, "{}", format_number(*n)),
            Bound::BigInt(i) => write!(f, "{}", i),
            Bound::Date(d) => write!(f, "{}", d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

impl Bound {
    fn to_json(self) -> serde_json::Value {
        match self {
            Bound::Number(n) => Value::Number(n).to_json(),
            Bound::BigInt(i) => serde_json::Value::String(i.to_string()),
            Bound::Date(d) => Value::Date(d).to_json(),
        }
    }
}

/// Sub-kind of an `invalid_string` issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringValidation {
    Email,
    Url,
    Uuid,
    Emoji,
    Nanoid,
    Cuid,
    Cuid2,
    Ulid,
    Regex,
    Datetime,
    Date,
    Time,
    Duration,
    Ip,
    Base64,
    Base64Url,
    Includes(String),
    StartsWith(String),
    EndsWith(String),
}

impl StringValidation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringValidation::Email => "email",
            StringValidation::Url => "url",
            StringValidation::Uuid => "uuid",
            StringValidation::Emoji => "emoji",
            StringValidation::Nanoid => "nanoid",
            StringValidation::Cuid => "cuid",
            StringValidation::Cuid2 => "cuid2",
            StringValidation::Ulid => "ulid",
            StringValidation::Regex => "regex",
            StringValidation::Datetime => "datetime",
            StringValidation::Date => "date",
            StringValidation::Time => "time",
            StringValidation::Duration => "duration",
            StringValidation::Ip => "ip",
            StringValidation::Base64 => "base64",
            StringValidation::Base64Url => "base64url",
            StringValidation::Includes(_) => "includes",
            StringValidation::StartsWith(_) => "startsWith",
            StringValidation::EndsWith(_) => "endsWith",
        }
    }
}

impl fmt::Display for StringValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable issue codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    InvalidType,
    InvalidLiteral,
    InvalidEnumValue,
    UnrecognizedKeys,
    InvalidUnion,
    InvalidDiscriminator,
    InvalidIntersectionTypes,
    TooSmall,
    TooBig,
    InvalidString,
    NotMultipleOf,
    NotFinite,
    InvalidDate,
    InvalidArguments,
    InvalidReturnType,
    Custom,
    ConfigurationError,
}

impl IssueCode {
    /// Returns the string code reported to callers
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::InvalidType => "invalid_type",
            IssueCode::InvalidLiteral => "invalid_literal",
            IssueCode::InvalidEnumValue => "invalid_enum_value",
            IssueCode::UnrecognizedKeys => "unrecognized_keys",
            IssueCode::InvalidUnion => "invalid_union",
            IssueCode::InvalidDiscriminator => "invalid_discriminator",
            IssueCode::InvalidIntersectionTypes => "invalid_intersection_types",
            IssueCode::TooSmall => "too_small",
            IssueCode::TooBig => "too_big",
            IssueCode::InvalidString => "invalid_string",
            IssueCode::NotMultipleOf => "not_multiple_of",
            IssueCode::NotFinite => "not_finite",
            IssueCode::InvalidDate => "invalid_date",
            IssueCode::InvalidArguments => "invalid_arguments",
            IssueCode::InvalidReturnType => "invalid_return_type",
            IssueCode::Custom => "custom",
            IssueCode::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Issue kind with its code-specific context.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    InvalidType {
        expected: String,
        received: ValueKind,
    },
    InvalidLiteral {
        expected: Value,
        received: Value,
    },
    InvalidEnumValue {
        options: Vec<Value>,
        received: Value,
    },
    UnrecognizedKeys {
        keys: Vec<String>,
    },
    /// Every variant failed; one issue list per variant, in declaration order.
    InvalidUnion {
        union_errors: Vec<Vec<Issue>>,
    },
    InvalidDiscriminator {
        options: Vec<Value>,
    },
    InvalidIntersectionTypes,
    TooSmall {
        origin: SizeOrigin,
        minimum: Bound,
        inclusive: bool,
        exact: bool,
    },
    TooBig {
        origin: SizeOrigin,
        maximum: Bound,
        inclusive: bool,
        exact: bool,
    },
    InvalidString {
        validation: StringValidation,
    },
    NotMultipleOf {
        multiple_of: Bound,
    },
    NotFinite,
    InvalidDate,
    InvalidArguments {
        argument_issues: Vec<Issue>,
    },
    InvalidReturnType {
        return_type_issues: Vec<Issue>,
    },
    Custom {
        params: BTreeMap<String, serde_json::Value>,
    },
    /// A synchronous parse reached an asynchronous step.
    ConfigurationError {
        reason: String,
    },
}

impl IssueKind {
    pub fn code(&self) -> IssueCode {
        match self {
            IssueKind::InvalidType { .. } => IssueCode::InvalidType,
            IssueKind::InvalidLiteral { .. } => IssueCode::InvalidLiteral,
            IssueKind::InvalidEnumValue { .. } => IssueCode::InvalidEnumValue,
            IssueKind::UnrecognizedKeys { .. } => IssueCode::UnrecognizedKeys,
            IssueKind::InvalidUnion { .. } => IssueCode::InvalidUnion,
            IssueKind::InvalidDiscriminator { .. } => IssueCode::InvalidDiscriminator,
            IssueKind::InvalidIntersectionTypes => IssueCode::InvalidIntersectionTypes,
            IssueKind::TooSmall { .. } => IssueCode::TooSmall,
            IssueKind::TooBig { .. } => IssueCode::TooBig,
            IssueKind::InvalidString { .. } => IssueCode::InvalidString,
            IssueKind::NotMultipleOf { .. } => IssueCode::NotMultipleOf,
            IssueKind::NotFinite => IssueCode::NotFinite,
            IssueKind::InvalidDate => IssueCode::InvalidDate,
            IssueKind::InvalidArguments { .. } => IssueCode::InvalidArguments,
            IssueKind::InvalidReturnType { .. } => IssueCode::InvalidReturnType,
            IssueKind::Custom { .. } => IssueCode::Custom,
            IssueKind::ConfigurationError { .. } => IssueCode::ConfigurationError,
        }
    }

    /// A custom issue with no params.
    pub fn custom() -> Self {
        IssueKind::Custom {
            params: BTreeMap::new(),
        }
    }
}

/// One validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub path: Vec<PathSegment>,
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    /// Creates a root-level issue with the default message for its kind.
    pub fn new(kind: IssueKind) -> Self {
        let message = default_message(&kind);
        Self {
            path: Vec::new(),
            kind,
            message,
        }
    }

    /// Replaces the message; `None` keeps the default.
    pub fn with_message(mut self, message: Option<&str>) -> Self {
        if let Some(m) = message {
            self.message = m.to_string();
        }
        self
    }

    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    /// Returns the issue with `segment` prefixed onto its path. Nested
    /// union issues are rooted at the same place and move with it.
    pub fn with_prepended_path(mut self, segment: impl Into<PathSegment>) -> Self {
        let segment = segment.into();
        if let IssueKind::InvalidUnion { union_errors } = &mut self.kind {
            for variant in union_errors.iter_mut() {
                for nested in std::mem::take(variant) {
                    variant.push(nested.with_prepended_path(segment.clone()));
                }
            }
        }
        self.path.insert(0, segment);
        self
    }

    pub fn code(&self) -> IssueCode {
        self.kind.code()
    }

    /// Path rendered as `a.b[0]`
    pub fn path_string(&self) -> String {
        format_path(&self.path)
    }

    /// Renders the issue as JSON: code, path, message and the scalar
    /// parts of its context.
    pub fn to_json(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        out.insert("code".into(), self.code().as_str().into());
        out.insert(
            "path".into(),
            serde_json::Value::Array(self.path.iter().map(PathSegment::to_json).collect()),
        );
        out.insert("message".into(), self.message.clone().into());
        match &self.kind {
            IssueKind::InvalidType { expected, received } => {
                out.insert("expected".into(), expected.clone().into());
                out.insert("received".into(), received.as_str().into());
            }
            IssueKind::InvalidLiteral { expected, received } => {
                out.insert("expected".into(), expected.to_json());
                out.insert("received".into(), received.to_json());
            }
            IssueKind::InvalidEnumValue { options, received } => {
                out.insert(
                    "options".into(),
                    serde_json::Value::Array(options.iter().map(Value::to_json).collect()),
                );
                out.insert("received".into(), received.to_json());
            }
            IssueKind::UnrecognizedKeys { keys } => {
                out.insert("keys".into(), keys.clone().into());
            }
            IssueKind::InvalidUnion { union_errors } => {
                let variants = union_errors
                    .iter()
                    .map(|issues| serde_json::Value::Array(issues.iter().map(Issue::to_json).collect()))
                    .collect();
                out.insert("unionErrors".into(), serde_json::Value::Array(variants));
            }
            IssueKind::InvalidDiscriminator { options } => {
                out.insert(
                    "options".into(),
                    serde_json::Value::Array(options.iter().map(Value::to_json).collect()),
                );
            }
            IssueKind::TooSmall {
                origin,
                minimum,
                inclusive,
                exact,
            } => {
                out.insert("type".into(), origin.as_str().into());
                out.insert("minimum".into(), minimum.to_json());
                out.insert("inclusive".into(), (*inclusive).into());
                out.insert("exact".into(), (*exact).into());
            }
            IssueKind::TooBig {
                origin,
                maximum,
                inclusive,
                exact,
            } => {
                out.insert("type".into(), origin.as_str().into());
                out.insert("maximum".into(), maximum.to_json());
                out.insert("inclusive".into(), (*inclusive).into());
                out.insert("exact".into(), (*exact).into());
            }
            IssueKind::InvalidString { validation } => {
                out.insert("validation".into(), validation.as_str().into());
            }
            IssueKind::NotMultipleOf { multiple_of } => {
                out.insert("multipleOf".into(), multiple_of.to_json());
            }
            IssueKind::Custom { params } if !params.is_empty() => {
                out.insert(
                    "params".into(),
                    serde_json::Value::Object(params.clone().into_iter().collect()),
                );
            }
            _ => {}
        }
        serde_json::Value::Object(out)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path_string(), self.message, self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[]), "(root)");
        let path = vec![
            PathSegment::from("users"),
            PathSegment::from(0),
            PathSegment::from("name"),
        ];
        assert_eq!(format_path(&path), "users[0].name");
    }

    #[test]
    fn test_prepend_path() {
        let issue = Issue::new(IssueKind::NotFinite)
            .with_prepended_path("b")
            .with_prepended_path("a");
        assert_eq!(issue.path_string(), "a.b");
        assert_eq!(issue.code().as_str(), "not_finite");
    }

    #[test]
    fn test_required_message_for_undefined() {
        let issue = Issue::new(IssueKind::InvalidType {
            expected: "string".into(),
            received: ValueKind::Undefined,
        });
        assert_eq!(issue.message, "Required");

        let issue = Issue::new(IssueKind::InvalidType {
            expected: "string".into(),
            received: ValueKind::Number,
        });
        assert_eq!(issue.message, "Expected string, received number");
    }

    #[test]
    fn test_custom_message_override() {
        let issue = Issue::new(IssueKind::custom()).with_message(Some("Too short"));
        assert_eq!(issue.message, "Too short");
        let issue = Issue::new(IssueKind::custom()).with_message(None);
        assert_eq!(issue.message, "Invalid input");
    }

    #[test]
    fn test_to_json() {
        let issue = Issue::new(IssueKind::TooSmall {
            origin: SizeOrigin::String,
            minimum: Bound::Number(3.0),
            inclusive: true,
            exact: false,
        })
        .with_prepended_path("name");
        assert_eq!(
            issue.to_json(),
            json!({
                "code": "too_small",
                "path": ["name"],
                "message": "String must contain at least 3 character(s)",
                "type": "string",
                "minimum": 3,
                "inclusive": true,
                "exact": false
            })
        );
    }
}
