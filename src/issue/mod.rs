//! Issue & result model
//!
//! Validation outcomes are data. A failed parse carries every issue
//! found, each with a path from the root, a stable code, a message and
//! a code-specific context.

mod errors;
mod messages;
mod result;
mod types;

pub use errors::{FlattenedIssues, ParseError, ValidationError};
pub use messages::default_message;
pub(crate) use messages::join_values;
pub use result::ParseResult;
pub use types::{
    format_path, Bound, Issue, IssueCode, IssueKind, PathSegment, SizeOrigin, StringValidation,
};
