//! Function schemas
//!
//! A function schema accepts a callable and outputs a wrapped callable
//! that validates its arguments and its return value on every call.

use super::builders;
use super::collections::TupleSchema;
use super::types::{Kind, Schema};
use crate::engine;
use crate::value::{FunctionError, FunctionValue, Value};

#[derive(Clone)]
pub struct FunctionSchema {
    pub(crate) args: TupleSchema,
    pub(crate) returns: Schema,
}

impl FunctionSchema {
    /// Any arguments, any return value.
    pub(crate) fn new() -> Self {
        Self {
            args: TupleSchema::new(Vec::new()).rest(builders::unknown()),
            returns: builders::unknown(),
        }
    }

    /// Positional argument schemas; extra arguments pass unchecked.
    pub fn args<I, S>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        let items = items.into_iter().map(Into::into).collect();
        Self {
            args: TupleSchema::new(items).rest(builders::unknown()),
            returns: self.returns.clone(),
        }
    }

    pub fn returns(&self, schema: impl Into<Schema>) -> Self {
        Self {
            args: self.args.clone(),
            returns: schema.into(),
        }
    }

    pub fn parameters(&self) -> &TupleSchema {
        &self.args
    }

    pub fn return_type(&self) -> &Schema {
        &self.returns
    }

    /// Wraps `f` so that every call is validated against this schema.
    pub fn implement<F>(&self, f: F) -> FunctionValue
    where
        F: Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        engine::validated_function(self.clone(), FunctionValue::new(f))
    }
}

impl From<FunctionSchema> for Schema {
    fn from(f: FunctionSchema) -> Self {
        Schema::from_kind(Kind::Function(f))
    }
}
