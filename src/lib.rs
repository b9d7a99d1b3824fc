//! schemakit - structural schema validation and transformation
//!
//! Build a [`Schema`] from combinators, then parse dynamic [`Value`]s
//! against it. A parse either returns the (possibly transformed) output
//! or every issue found, each with a path, a stable code and a message.
//!
//! ```ignore
//! use schemakit::prelude::*;
//!
//! let user: Schema = object([
//!     ("name", string().min(1).into()),
//!     ("age", optional(number().int().nonnegative())),
//! ])
//! .into();
//!
//! let result = user.safe_parse(serde_json::json!({ "name": "" }));
//! assert_eq!(result.issues()[0].path_string(), "name");
//! ```
//!
//! Subsystems:
//! - `value`: the dynamic value tree
//! - `schema`: schema nodes and builders
//! - `engine`: sync/async parsing
//! - `issue`: issues, results and errors
//! - `loader`: schemas declared as JSON documents
//! - `config`, `observability`, `cli`: the ambient runtime

pub mod cli;
pub mod config;
pub mod engine;
pub mod issue;
pub mod loader;
pub mod observability;
pub mod schema;
pub mod value;

pub use engine::CancelSignal;
pub use issue::{Issue, IssueCode, IssueKind, ParseError, ParseResult, ValidationError};
pub use schema::{Schema, SchemaExt};
pub use value::Value;

/// Builders and the types most callers need.
pub mod prelude {
    pub use crate::engine::CancelSignal;
    pub use crate::issue::{Issue, IssueCode, IssueKind, ParseError, ParseResult, ValidationError};
    pub use crate::schema::{
        any, array, bigint, boolean, coerce, date, discriminated_union, enum_of, function,
        instance_of, intersection, lazy, literal, map, native_enum, never, null, nullable, number,
        object, optional, preprocess, promise, record, set, strict_object, string, symbol, tuple,
        undefined, union, unknown, void, CustomIssue, RefineParams, Schema, SchemaExt,
        TransformOutcome,
    };
    pub use crate::value::Value;
}
