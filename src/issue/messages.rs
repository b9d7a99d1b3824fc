//! Default issue messages

use super::types::{IssueKind, SizeOrigin, StringValidation};
use crate::value::{Value, ValueKind};

/// Returns the message reported when a check carries no override.
pub fn default_message(kind: &IssueKind) -> String {
    match kind {
        IssueKind::InvalidType { expected, received } => {
            if *received == ValueKind::Undefined {
                "Required".to_string()
            } else {
                format!("Expected {}, received {}", expected, received)
            }
        }
        IssueKind::InvalidLiteral { expected, .. } => {
            format!("Invalid literal value, expected {}", expected)
        }
        IssueKind::InvalidEnumValue { options, received } => format!(
            "Invalid enum value. Expected {}, received {}",
            join_values(options),
            quote(received)
        ),
        IssueKind::UnrecognizedKeys { keys } => {
            let keys: Vec<String> = keys.iter().map(|k| format!("'{}'", k)).collect();
            format!("Unrecognized key(s) in object: {}", keys.join(", "))
        }
        IssueKind::InvalidUnion { .. } => "Invalid input".to_string(),
        IssueKind::InvalidDiscriminator { options } => format!(
            "Invalid discriminator value. Expected {}",
            join_values(options)
        ),
        IssueKind::InvalidIntersectionTypes => {
            "Intersection results could not be merged".to_string()
        }
        IssueKind::TooSmall {
            origin,
            minimum,
            inclusive,
            exact,
        } => match origin {
            SizeOrigin::String => format!(
                "String must contain {} {} character(s)",
                pick(*exact, *inclusive, "exactly", "at least", "over"),
                minimum
            ),
            SizeOrigin::Array | SizeOrigin::Set => format!(
                "{} must contain {} {} element(s)",
                container(*origin),
                pick(*exact, *inclusive, "exactly", "at least", "more than"),
                minimum
            ),
            SizeOrigin::Number | SizeOrigin::BigInt => format!(
                "{} must be {} {}",
                numeric(*origin),
                pick(
                    *exact,
                    *inclusive,
                    "exactly equal to",
                    "greater than or equal to",
                    "greater than"
                ),
                minimum
            ),
            SizeOrigin::Date => format!(
                "Date must be {} {}",
                pick(
                    *exact,
                    *inclusive,
                    "exactly equal to",
                    "greater than or equal to",
                    "greater than"
                ),
                minimum
            ),
        },
        IssueKind::TooBig {
            origin,
            maximum,
            inclusive,
            exact,
        } => match origin {
            SizeOrigin::String => format!(
                "String must contain {} {} character(s)",
                pick(*exact, *inclusive, "exactly", "at most", "under"),
                maximum
            ),
            SizeOrigin::Array | SizeOrigin::Set => format!(
                "{} must contain {} {} element(s)",
                container(*origin),
                pick(*exact, *inclusive, "exactly", "at most", "less than"),
                maximum
            ),
            SizeOrigin::Number | SizeOrigin::BigInt => format!(
                "{} must be {} {}",
                numeric(*origin),
                pick(
                    *exact,
                    *inclusive,
                    "exactly",
                    "less than or equal to",
                    "less than"
                ),
                maximum
            ),
            SizeOrigin::Date => format!(
                "Date must be {} {}",
                pick(
                    *exact,
                    *inclusive,
                    "exactly",
                    "smaller than or equal to",
                    "smaller than"
                ),
                maximum
            ),
        },
        IssueKind::InvalidString { validation } => match validation {
            StringValidation::Regex => "Invalid".to_string(),
            StringValidation::Includes(s) => format!("Invalid input: must include \"{}\"", s),
            StringValidation::StartsWith(s) => {
                format!("Invalid input: must start with \"{}\"", s)
            }
            StringValidation::EndsWith(s) => format!("Invalid input: must end with \"{}\"", s),
            other => format!("Invalid {}", other),
        },
        IssueKind::NotMultipleOf { multiple_of } => {
            format!("Number must be a multiple of {}", multiple_of)
        }
        IssueKind::NotFinite => "Number must be finite".to_string(),
        IssueKind::InvalidDate => "Invalid date".to_string(),
        IssueKind::InvalidArguments { .. } => "Invalid function arguments".to_string(),
        IssueKind::InvalidReturnType { .. } => "Invalid function return type".to_string(),
        IssueKind::Custom { .. } => "Invalid input".to_string(),
        IssueKind::ConfigurationError { reason } => reason.clone(),
    }
}

fn pick(
    exact: bool,
    inclusive: bool,
    when_exact: &'static str,
    when_inclusive: &'static str,
    otherwise: &'static str,
) -> &'static str {
    if exact {
        when_exact
    } else if inclusive {
        when_inclusive
    } else {
        otherwise
    }
}

fn container(origin: SizeOrigin) -> &'static str {
    match origin {
        SizeOrigin::Set => "Set",
        _ => "Array",
    }
}

fn numeric(origin: SizeOrigin) -> &'static str {
    match origin {
        SizeOrigin::BigInt => "BigInt",
        _ => "Number",
    }
}

/// Strings in single quotes, everything else as displayed.
fn quote(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

pub(crate) fn join_values(values: &[Value]) -> String {
    values.iter().map(quote).collect::<Vec<_>>().join(" | ")
}
