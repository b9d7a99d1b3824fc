//! Constraint checks of scalar schemas and collection sizes
//!
//! Within one node checks are fail-fast: the first failing check is the
//! node's only issue.

use chrono::{DateTime, Utc};

use super::formats;
use crate::issue::{Bound, Issue, IssueKind, SizeOrigin, StringValidation};
use crate::schema::{
    BigIntRule, BigIntSchema, Check, DateRule, DateSchema, NumberRule, NumberSchema, SizeRule,
    StringRule, StringSchema,
};
use crate::value::ValueKind;

fn too_small(origin: SizeOrigin, minimum: Bound, inclusive: bool, exact: bool) -> Issue {
    Issue::new(IssueKind::TooSmall {
        origin,
        minimum,
        inclusive,
        exact,
    })
}

fn too_big(origin: SizeOrigin, maximum: Bound, inclusive: bool, exact: bool) -> Issue {
    Issue::new(IssueKind::TooBig {
        origin,
        maximum,
        inclusive,
        exact,
    })
}

fn invalid_string(validation: StringValidation) -> Issue {
    Issue::new(IssueKind::InvalidString { validation })
}

fn count(n: usize) -> Bound {
    Bound::Number(n as f64)
}

/// Checks a length against size rules; lengths are counted by the caller.
fn check_length<R>(
    checks: &[Check<R>],
    rule_of: impl Fn(&R) -> Option<SizeRule>,
    len: usize,
    origin: SizeOrigin,
) -> Result<(), Issue> {
    for check in checks {
        let issue = match rule_of(&check.rule) {
            Some(SizeRule::Min(n)) if len < n => too_small(origin, count(n), true, false),
            Some(SizeRule::Max(n)) if len > n => too_big(origin, count(n), true, false),
            Some(SizeRule::Length(n)) if len < n => too_small(origin, count(n), true, true),
            Some(SizeRule::Length(n)) if len > n => too_big(origin, count(n), true, true),
            _ => continue,
        };
        return Err(issue.with_message(check.message.as_deref()));
    }
    Ok(())
}

/// Element-count checks of arrays and sets.
pub(crate) fn check_size(
    checks: &[Check<SizeRule>],
    len: usize,
    origin: SizeOrigin,
) -> Result<(), Issue> {
    check_length(checks, |rule| Some(*rule), len, origin)
}

/// Runs string checks in order. Trim and case rules rewrite the value
/// seen by later checks and returned as output.
pub(crate) fn check_string(schema: &StringSchema, mut s: String) -> Result<String, Issue> {
    for check in &schema.checks {
        let failed = match &check.rule {
            StringRule::Min(_) | StringRule::Max(_) | StringRule::Length(_) => {
                let single = std::slice::from_ref(check);
                let as_size = |rule: &StringRule| match rule {
                    StringRule::Min(n) => Some(SizeRule::Min(*n)),
                    StringRule::Max(n) => Some(SizeRule::Max(*n)),
                    StringRule::Length(n) => Some(SizeRule::Length(*n)),
                    _ => None,
                };
                check_length(single, as_size, s.chars().count(), SizeOrigin::String).err()
            }
            StringRule::Format(format) => {
                (!formats::matches(format, &s)).then(|| invalid_string(format.validation()))
            }
            StringRule::Regex(re) => {
                (!re.is_match(&s)).then(|| invalid_string(StringValidation::Regex))
            }
            StringRule::Includes { needle, position } => {
                let haystack: &str = match position {
                    Some(p) => s.char_indices().nth(*p).map_or("", |(i, _)| &s[i..]),
                    None => &s,
                };
                (!haystack.contains(needle.as_str()))
                    .then(|| invalid_string(StringValidation::Includes(needle.clone())))
            }
            StringRule::StartsWith(prefix) => (!s.starts_with(prefix.as_str()))
                .then(|| invalid_string(StringValidation::StartsWith(prefix.clone()))),
            StringRule::EndsWith(suffix) => (!s.ends_with(suffix.as_str()))
                .then(|| invalid_string(StringValidation::EndsWith(suffix.clone()))),
            StringRule::Trim => {
                s = s.trim().to_string();
                None
            }
            StringRule::ToLowerCase => {
                s = s.to_lowercase();
                None
            }
            StringRule::ToUpperCase => {
                s = s.to_uppercase();
                None
            }
        };
        if let Some(issue) = failed {
            return Err(issue.with_message(check.message.as_deref()));
        }
    }
    Ok(s)
}

/// Number of digits after the decimal point in the shortest rendering.
fn decimal_count(n: f64) -> i32 {
    let text = format!("{}", n);
    text.split_once('.').map_or(0, |(_, frac)| frac.len() as i32)
}

/// `value % step == 0`, computed on values scaled to integers so that
/// `0.3` is a multiple of `0.1`.
fn is_multiple_of(value: f64, step: f64) -> bool {
    let decimals = decimal_count(value).max(decimal_count(step)).min(15);
    let scale = 10f64.powi(decimals);
    let (v, s) = ((value * scale).round(), (step * scale).round());
    if s == 0.0 || !v.is_finite() || !s.is_finite() {
        return false;
    }
    v % s == 0.0
}

pub(crate) fn check_number(schema: &NumberSchema, n: f64) -> Result<f64, Issue> {
    for check in &schema.checks {
        let failed = match check.rule {
            NumberRule::Min { value, inclusive } => {
                let ok = if inclusive { n >= value } else { n > value };
                (!ok).then(|| too_small(SizeOrigin::Number, Bound::Number(value), inclusive, false))
            }
            NumberRule::Max { value, inclusive } => {
                let ok = if inclusive { n <= value } else { n < value };
                (!ok).then(|| too_big(SizeOrigin::Number, Bound::Number(value), inclusive, false))
            }
            NumberRule::Int => (!n.is_finite() || n.fract() != 0.0).then(|| {
                Issue::new(IssueKind::InvalidType {
                    expected: "integer".to_string(),
                    received: ValueKind::Number,
                })
            }),
            NumberRule::MultipleOf(step) => (!is_multiple_of(n, step)).then(|| {
                Issue::new(IssueKind::NotMultipleOf {
                    multiple_of: Bound::Number(step),
                })
            }),
            NumberRule::Finite => (!n.is_finite()).then(|| Issue::new(IssueKind::NotFinite)),
        };
        if let Some(issue) = failed {
            return Err(issue.with_message(check.message.as_deref()));
        }
    }
    Ok(n)
}

pub(crate) fn check_bigint(schema: &BigIntSchema, n: i128) -> Result<i128, Issue> {
    for check in &schema.checks {
        let failed = match check.rule {
            BigIntRule::Min { value, inclusive } => {
                let ok = if inclusive { n >= value } else { n > value };
                (!ok).then(|| too_small(SizeOrigin::BigInt, Bound::BigInt(value), inclusive, false))
            }
            BigIntRule::Max { value, inclusive } => {
                let ok = if inclusive { n <= value } else { n < value };
                (!ok).then(|| too_big(SizeOrigin::BigInt, Bound::BigInt(value), inclusive, false))
            }
            BigIntRule::MultipleOf(step) => (n.checked_rem(step) != Some(0)).then(|| {
                Issue::new(IssueKind::NotMultipleOf {
                    multiple_of: Bound::BigInt(step),
                })
            }),
        };
        if let Some(issue) = failed {
            return Err(issue.with_message(check.message.as_deref()));
        }
    }
    Ok(n)
}

pub(crate) fn check_date(schema: &DateSchema, d: DateTime<Utc>) -> Result<DateTime<Utc>, Issue> {
    for check in &schema.checks {
        let failed = match check.rule {
            DateRule::Min(at) => {
                (d < at).then(|| too_small(SizeOrigin::Date, Bound::Date(at), true, false))
            }
            DateRule::Max(at) => {
                (d > at).then(|| too_big(SizeOrigin::Date, Bound::Date(at), true, false))
            }
        };
        if let Some(issue) = failed {
            return Err(issue.with_message(check.message.as_deref()));
        }
    }
    Ok(d)
}
