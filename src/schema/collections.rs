//! Array, tuple and set schemas

use super::checks::{set_last_message, Check, SizeRule};
use super::types::{Kind, Schema};

/// Variable-length sequence validated against one element schema.
#[derive(Clone)]
pub struct ArraySchema {
    pub(crate) element: Schema,
    pub(crate) checks: Vec<Check<SizeRule>>,
}

impl ArraySchema {
    pub(crate) fn new(element: Schema) -> Self {
        Self {
            element,
            checks: Vec::new(),
        }
    }

    fn with(mut self, rule: SizeRule) -> Self {
        self.checks.push(Check::new(rule));
        self
    }

    pub fn element(&self) -> &Schema {
        &self.element
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        set_last_message(&mut self.checks, message.into());
        self
    }

    pub fn min(self, n: usize) -> Self {
        self.with(SizeRule::Min(n))
    }

    pub fn max(self, n: usize) -> Self {
        self.with(SizeRule::Max(n))
    }

    pub fn length(self, n: usize) -> Self {
        self.with(SizeRule::Length(n))
    }

    pub fn nonempty(self) -> Self {
        self.min(1)
    }
}

impl From<ArraySchema> for Schema {
    fn from(array: ArraySchema) -> Self {
        Schema::from_kind(Kind::Array(array))
    }
}

/// Fixed-length sequence validated positionally, with an optional
/// variadic tail.
#[derive(Clone)]
pub struct TupleSchema {
    pub(crate) items: Vec<Schema>,
    pub(crate) rest: Option<Schema>,
}

impl TupleSchema {
    pub(crate) fn new(items: Vec<Schema>) -> Self {
        Self { items, rest: None }
    }

    pub fn items(&self) -> &[Schema] {
        &self.items
    }

    /// Validates every element past the positional ones against `schema`.
    pub fn rest(mut self, schema: impl Into<Schema>) -> Self {
        self.rest = Some(schema.into());
        self
    }
}

impl From<TupleSchema> for Schema {
    fn from(tuple: TupleSchema) -> Self {
        Schema::from_kind(Kind::Tuple(tuple))
    }
}

/// Collection of unique members validated against one element schema.
#[derive(Clone)]
pub struct SetSchema {
    pub(crate) element: Schema,
    pub(crate) checks: Vec<Check<SizeRule>>,
}

impl SetSchema {
    pub(crate) fn new(element: Schema) -> Self {
        Self {
            element,
            checks: Vec::new(),
        }
    }

    fn with(mut self, rule: SizeRule) -> Self {
        self.checks.push(Check::new(rule));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        set_last_message(&mut self.checks, message.into());
        self
    }

    pub fn min(self, n: usize) -> Self {
        self.with(SizeRule::Min(n))
    }

    pub fn max(self, n: usize) -> Self {
        self.with(SizeRule::Max(n))
    }

    pub fn size(self, n: usize) -> Self {
        self.with(SizeRule::Length(n))
    }

    pub fn nonempty(self) -> Self {
        self.min(1)
    }
}

impl From<SetSchema> for Schema {
    fn from(set: SetSchema) -> Self {
        Schema::from_kind(Kind::Set(set))
    }
}
