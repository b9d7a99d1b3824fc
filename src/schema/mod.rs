//! Schema nodes and combinator builders
//!
//! # Design Principles
//!
//! - Schemas are immutable once built and safe to share across threads
//! - Derivations produce new schemas; bases are never mutated
//! - Kinds form a closed enum, matched exhaustively by the engine
//! - Checks run in attachment order
//! - Post-validation steps carry their issues as return values

mod builders;
mod checks;
mod choice;
mod collections;
mod errors;
mod function;
mod lazy;
mod object;
mod pipeline;
mod primitives;
mod types;

pub use builders::{
    any, array, bigint, boolean, coerce, date, discriminated_union, enum_of, function,
    instance_of, intersection, lazy, literal, map, native_enum, never, null, nullable, number,
    object, optional, preprocess, promise, record, set, strict_object, string, symbol, tuple,
    undefined, union, unknown, void,
};
pub use checks::{DatetimeOptions, IpVersion};
pub use choice::{DiscriminatedUnionSchema, EnumSchema, NativeEnumSchema};
pub use collections::{ArraySchema, SetSchema, TupleSchema};
pub use errors::SchemaBuildError;
pub use function::FunctionSchema;
pub use lazy::LazySchema;
pub use object::{ObjectSchema, UnknownKeys};
pub use pipeline::{CustomIssue, RefineParams, SchemaExt, TransformOutcome};
pub use primitives::{BigIntSchema, DateSchema, NumberSchema, StringSchema, MAX_SAFE_INTEGER};
pub use types::{Literal, Schema};

pub(crate) use checks::{
    BigIntRule, Check, DateRule, NumberRule, SizeRule, StringFormat, StringRule,
};
pub(crate) use pipeline::{Callback, Step};
pub(crate) use types::Kind;
