//! Scalar schemas with chained constraints
//!
//! Each builder method appends one check and returns the builder, so
//! `string().min(3).max(10).email()` reads left to right in the order the
//! checks run.

use chrono::{DateTime, Utc};
use regex::Regex;

use super::checks::{
    set_last_message, BigIntRule, Check, DateRule, DatetimeOptions, IpVersion, NumberRule,
    StringFormat, StringRule,
};
use super::types::{Kind, Schema};

/// Largest integer a double represents exactly.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// String schema.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub(crate) checks: Vec<Check<StringRule>>,
    pub(crate) coerce: bool,
}

impl StringSchema {
    pub(crate) fn coerced() -> Self {
        Self {
            coerce: true,
            ..Self::default()
        }
    }

    fn with(mut self, rule: StringRule) -> Self {
        self.checks.push(Check::new(rule));
        self
    }

    fn format(self, format: StringFormat) -> Self {
        self.with(StringRule::Format(format))
    }

    /// Overrides the message of the last attached check.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        set_last_message(&mut self.checks, message.into());
        self
    }

    /// At least `n` characters
    pub fn min(self, n: usize) -> Self {
        self.with(StringRule::Min(n))
    }

    pub fn max(self, n: usize) -> Self {
        self.with(StringRule::Max(n))
    }

    pub fn length(self, n: usize) -> Self {
        self.with(StringRule::Length(n))
    }

    pub fn nonempty(self) -> Self {
        self.min(1)
    }

    pub fn email(self) -> Self {
        self.format(StringFormat::Email)
    }

    pub fn url(self) -> Self {
        self.format(StringFormat::Url)
    }

    pub fn uuid(self) -> Self {
        self.format(StringFormat::Uuid)
    }

    pub fn emoji(self) -> Self {
        self.format(StringFormat::Emoji)
    }

    pub fn nanoid(self) -> Self {
        self.format(StringFormat::Nanoid)
    }

    pub fn cuid(self) -> Self {
        self.format(StringFormat::Cuid)
    }

    pub fn cuid2(self) -> Self {
        self.format(StringFormat::Cuid2)
    }

    pub fn ulid(self) -> Self {
        self.format(StringFormat::Ulid)
    }

    /// ISO 8601 timestamp with a `Z` zone and any fractional precision.
    pub fn datetime(self) -> Self {
        self.datetime_with(DatetimeOptions::default())
    }

    pub fn datetime_with(self, options: DatetimeOptions) -> Self {
        self.format(StringFormat::Datetime(options))
    }

    /// Calendar date `YYYY-MM-DD`
    pub fn date(self) -> Self {
        self.format(StringFormat::Date)
    }

    /// Time of day `HH:MM:SS[.s+]`
    pub fn time(self) -> Self {
        self.time_with(None)
    }

    pub fn time_with(self, precision: Option<u32>) -> Self {
        self.format(StringFormat::Time(precision))
    }

    /// ISO 8601 duration
    pub fn duration(self) -> Self {
        self.format(StringFormat::Duration)
    }

    pub fn ip(self) -> Self {
        self.ip_version(IpVersion::Any)
    }

    pub fn ip_version(self, version: IpVersion) -> Self {
        self.format(StringFormat::Ip(version))
    }

    pub fn base64(self) -> Self {
        self.format(StringFormat::Base64)
    }

    pub fn base64url(self) -> Self {
        self.format(StringFormat::Base64Url)
    }

    pub fn regex(self, pattern: Regex) -> Self {
        self.with(StringRule::Regex(pattern))
    }

    pub fn includes(self, needle: impl Into<String>) -> Self {
        self.with(StringRule::Includes {
            needle: needle.into(),
            position: None,
        })
    }

    /// Substring search starting at character `position`.
    pub fn includes_at(self, needle: impl Into<String>, position: usize) -> Self {
        self.with(StringRule::Includes {
            needle: needle.into(),
            position: Some(position),
        })
    }

    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        self.with(StringRule::StartsWith(prefix.into()))
    }

    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        self.with(StringRule::EndsWith(suffix.into()))
    }

    /// Strips surrounding whitespace before the checks that follow.
    pub fn trim(self) -> Self {
        self.with(StringRule::Trim)
    }

    pub fn to_lowercase(self) -> Self {
        self.with(StringRule::ToLowerCase)
    }

    pub fn to_uppercase(self) -> Self {
        self.with(StringRule::ToUpperCase)
    }
}

/// Number schema (IEEE double).
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    pub(crate) checks: Vec<Check<NumberRule>>,
    pub(crate) coerce: bool,
}

impl NumberSchema {
    pub(crate) fn coerced() -> Self {
        Self {
            coerce: true,
            ..Self::default()
        }
    }

    fn with(mut self, rule: NumberRule) -> Self {
        self.checks.push(Check::new(rule));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        set_last_message(&mut self.checks, message.into());
        self
    }

    pub fn gt(self, value: f64) -> Self {
        self.with(NumberRule::Min {
            value,
            inclusive: false,
        })
    }

    pub fn gte(self, value: f64) -> Self {
        self.with(NumberRule::Min {
            value,
            inclusive: true,
        })
    }

    /// Alias of `gte`
    pub fn min(self, value: f64) -> Self {
        self.gte(value)
    }

    pub fn lt(self, value: f64) -> Self {
        self.with(NumberRule::Max {
            value,
            inclusive: false,
        })
    }

    pub fn lte(self, value: f64) -> Self {
        self.with(NumberRule::Max {
            value,
            inclusive: true,
        })
    }

    /// Alias of `lte`
    pub fn max(self, value: f64) -> Self {
        self.lte(value)
    }

    pub fn positive(self) -> Self {
        self.gt(0.0)
    }

    pub fn nonnegative(self) -> Self {
        self.gte(0.0)
    }

    pub fn negative(self) -> Self {
        self.lt(0.0)
    }

    pub fn nonpositive(self) -> Self {
        self.lte(0.0)
    }

    pub fn int(self) -> Self {
        self.with(NumberRule::Int)
    }

    pub fn multiple_of(self, value: f64) -> Self {
        self.with(NumberRule::MultipleOf(value))
    }

    /// Alias of `multiple_of`
    pub fn step(self, value: f64) -> Self {
        self.multiple_of(value)
    }

    pub fn finite(self) -> Self {
        self.with(NumberRule::Finite)
    }

    /// Within the range of exactly representable integers. A trailing
    /// `.message(..)` applies to the upper bound only.
    pub fn safe(self) -> Self {
        self.gte(-MAX_SAFE_INTEGER).lte(MAX_SAFE_INTEGER)
    }
}

/// Arbitrary-precision integer schema, backed by `i128`.
#[derive(Debug, Clone, Default)]
pub struct BigIntSchema {
    pub(crate) checks: Vec<Check<BigIntRule>>,
    pub(crate) coerce: bool,
}

impl BigIntSchema {
    pub(crate) fn coerced() -> Self {
        Self {
            coerce: true,
            ..Self::default()
        }
    }

    fn with(mut self, rule: BigIntRule) -> Self {
        self.checks.push(Check::new(rule));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        set_last_message(&mut self.checks, message.into());
        self
    }

    pub fn gt(self, value: i128) -> Self {
        self.with(BigIntRule::Min {
            value,
            inclusive: false,
        })
    }

    pub fn gte(self, value: i128) -> Self {
        self.with(BigIntRule::Min {
            value,
            inclusive: true,
        })
    }

    pub fn min(self, value: i128) -> Self {
        self.gte(value)
    }

    pub fn lt(self, value: i128) -> Self {
        self.with(BigIntRule::Max {
            value,
            inclusive: false,
        })
    }

    pub fn lte(self, value: i128) -> Self {
        self.with(BigIntRule::Max {
            value,
            inclusive: true,
        })
    }

    pub fn max(self, value: i128) -> Self {
        self.lte(value)
    }

    pub fn positive(self) -> Self {
        self.gt(0)
    }

    pub fn nonnegative(self) -> Self {
        self.gte(0)
    }

    pub fn negative(self) -> Self {
        self.lt(0)
    }

    pub fn nonpositive(self) -> Self {
        self.lte(0)
    }

    pub fn multiple_of(self, value: i128) -> Self {
        self.with(BigIntRule::MultipleOf(value))
    }
}

/// Date schema (UTC instants).
#[derive(Debug, Clone, Default)]
pub struct DateSchema {
    pub(crate) checks: Vec<Check<DateRule>>,
    pub(crate) coerce: bool,
}

impl DateSchema {
    pub(crate) fn coerced() -> Self {
        Self {
            coerce: true,
            ..Self::default()
        }
    }

    fn with(mut self, rule: DateRule) -> Self {
        self.checks.push(Check::new(rule));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        set_last_message(&mut self.checks, message.into());
        self
    }

    /// Not earlier than `at`
    pub fn min(self, at: DateTime<Utc>) -> Self {
        self.with(DateRule::Min(at))
    }

    /// Not later than `at`
    pub fn max(self, at: DateTime<Utc>) -> Self {
        self.with(DateRule::Max(at))
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Self {
        Schema::from_kind(Kind::String(s))
    }
}

impl From<NumberSchema> for Schema {
    fn from(n: NumberSchema) -> Self {
        Schema::from_kind(Kind::Number(n))
    }
}

impl From<BigIntSchema> for Schema {
    fn from(b: BigIntSchema) -> Self {
        Schema::from_kind(Kind::BigInt(b))
    }
}

impl From<DateSchema> for Schema {
    fn from(d: DateSchema) -> Self {
        Schema::from_kind(Kind::Date(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_applies_to_last_check() {
        let s = StringSchema::default().min(2).max(5).message("too long");
        assert_eq!(s.checks.len(), 2);
        assert!(s.checks[0].message.is_none());
        assert_eq!(s.checks[1].message.as_deref(), Some("too long"));
    }

    #[test]
    fn test_message_without_checks_is_ignored() {
        let s = NumberSchema::default().message("ignored");
        assert!(s.checks.is_empty());
    }

    #[test]
    fn test_sign_helpers_expand_to_bounds() {
        let n = NumberSchema::default().positive().nonpositive();
        assert_eq!(
            n.checks[0].rule,
            NumberRule::Min {
                value: 0.0,
                inclusive: false
            }
        );
        assert_eq!(
            n.checks[1].rule,
            NumberRule::Max {
                value: 0.0,
                inclusive: true
            }
        );

        let b = BigIntSchema::default().negative();
        assert_eq!(
            b.checks[0].rule,
            BigIntRule::Max {
                value: 0,
                inclusive: false
            }
        );
    }

    #[test]
    fn test_safe_adds_both_bounds() {
        let n = NumberSchema::default().safe();
        assert_eq!(n.checks.len(), 2);
    }
}
