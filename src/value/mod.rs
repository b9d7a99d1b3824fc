//! Dynamic value model
//!
//! The engine validates and produces `Value` trees. Conversions to and
//! from `serde_json::Value` live in `convert`.

mod convert;
mod function;
mod promise;
mod types;

pub use function::{FunctionError, FunctionValue, NativeFn};
pub use promise::{Promise, Rejection, Settled};
pub use types::{format_number, Object, OpaqueValue, Symbol, Value, ValueKind};
