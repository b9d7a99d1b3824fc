//! Declarative schema documents
//!
//! Named schemas described as JSON, compiled into ordinary `Schema`
//! values and kept in a `SchemaRegistry`.
//!
//! # Invariants
//!
//! - A registered name is never replaced
//! - Every `ref` names a document known to the registry
//! - References resolve at parse time, so documents may be recursive

mod compile;
mod document;
mod errors;
mod registry;

pub use document::{NodeDoc, SchemaDocument, UnknownKeysDoc};
pub use errors::LoaderError;
pub use registry::SchemaRegistry;
