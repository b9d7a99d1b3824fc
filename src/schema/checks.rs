//! Constraint checks attached to leaf and collection schemas
//!
//! Checks run in attachment order. Each carries an optional message
//! override set with `.message(..)` right after the check is attached.

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::issue::StringValidation;

/// One constraint with its optional message override.
#[derive(Debug, Clone)]
pub(crate) struct Check<R> {
    pub(crate) rule: R,
    pub(crate) message: Option<String>,
}

impl<R> Check<R> {
    pub(crate) fn new(rule: R) -> Self {
        Self {
            rule,
            message: None,
        }
    }
}

/// Overrides the message of the most recently attached check.
pub(crate) fn set_last_message<R>(checks: &mut [Check<R>], message: String) {
    if let Some(last) = checks.last_mut() {
        last.message = Some(message);
    }
}

/// IP address family accepted by `ip` checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpVersion {
    V4,
    V6,
    #[default]
    Any,
}

/// Options of the `datetime` format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatetimeOptions {
    /// Accept `+hh:mm` offsets besides `Z`
    pub offset: bool,
    /// Accept a missing zone designator
    pub local: bool,
    /// Exact number of fractional second digits; any when `None`
    pub precision: Option<u32>,
}

#[derive(Debug, Clone)]
pub(crate) enum StringFormat {
    Email,
    Url,
    Uuid,
    Emoji,
    Nanoid,
    Cuid,
    Cuid2,
    Ulid,
    Datetime(DatetimeOptions),
    Date,
    /// Fractional second digits; any when `None`
    Time(Option<u32>),
    Duration,
    Ip(IpVersion),
    Base64,
    Base64Url,
}

impl StringFormat {
    pub(crate) fn validation(&self) -> StringValidation {
        match self {
            StringFormat::Email => StringValidation::Email,
            StringFormat::Url => StringValidation::Url,
            StringFormat::Uuid => StringValidation::Uuid,
            StringFormat::Emoji => StringValidation::Emoji,
            StringFormat::Nanoid => StringValidation::Nanoid,
            StringFormat::Cuid => StringValidation::Cuid,
            StringFormat::Cuid2 => StringValidation::Cuid2,
            StringFormat::Ulid => StringValidation::Ulid,
            StringFormat::Datetime(_) => StringValidation::Datetime,
            StringFormat::Date => StringValidation::Date,
            StringFormat::Time(_) => StringValidation::Time,
            StringFormat::Duration => StringValidation::Duration,
            StringFormat::Ip(_) => StringValidation::Ip,
            StringFormat::Base64 => StringValidation::Base64,
            StringFormat::Base64Url => StringValidation::Base64Url,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum StringRule {
    Min(usize),
    Max(usize),
    Length(usize),
    Format(StringFormat),
    Regex(Regex),
    Includes {
        needle: String,
        position: Option<usize>,
    },
    StartsWith(String),
    EndsWith(String),
    Trim,
    ToLowerCase,
    ToUpperCase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NumberRule {
    Min { value: f64, inclusive: bool },
    Max { value: f64, inclusive: bool },
    Int,
    MultipleOf(f64),
    Finite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BigIntRule {
    Min { value: i128, inclusive: bool },
    Max { value: i128, inclusive: bool },
    MultipleOf(i128),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateRule {
    Min(DateTime<Utc>),
    Max(DateTime<Utc>),
}

/// Element-count bounds of arrays and sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SizeRule {
    Min(usize),
    Max(usize),
    Length(usize),
}
