//! Schema node model
//!
//! A `Schema` is a shared handle to an immutable `Node`:
//! - `kind` selects the base rule and holds its checks and children
//! - `steps` is the post-validation pipeline, run in attachment order
//! - `description` is free-form documentation
//! - `anchor` keeps alive whatever the node's references resolve through
//!
//! Derivations (`extend`, `pick`, `refine`, ...) build new nodes and
//! share unchanged children by reference.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use super::choice::{DiscriminatedUnionSchema, EnumSchema, NativeEnumSchema};
use super::collections::{ArraySchema, SetSchema, TupleSchema};
use super::function::FunctionSchema;
use super::lazy::LazySchema;
use super::object::ObjectSchema;
use super::pipeline::{PreprocessFn, Step};
use super::primitives::{BigIntSchema, DateSchema, NumberSchema, StringSchema};
use crate::value::{Symbol, Value};

/// Shared handle to an immutable schema node.
#[derive(Clone)]
pub struct Schema(pub(crate) Arc<Node>);

/// Owner held by a node so that weak references below it stay valid.
pub(crate) type Anchor = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) kind: Kind,
    pub(crate) steps: Vec<Step>,
    pub(crate) description: Option<String>,
    pub(crate) anchor: Option<Anchor>,
}

/// Closed set of base rules.
#[derive(Clone)]
pub(crate) enum Kind {
    String(StringSchema),
    Number(NumberSchema),
    BigInt(BigIntSchema),
    Boolean { coerce: bool },
    Date(DateSchema),
    Symbol,
    Undefined,
    Null,
    Void,
    Any,
    Unknown,
    Never,
    Literal(Literal),
    Enum(EnumSchema),
    NativeEnum(NativeEnumSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Tuple(TupleSchema),
    Set(SetSchema),
    Record { key: Schema, value: Schema },
    Map { key: Schema, value: Schema },
    Union(Vec<Schema>),
    DiscriminatedUnion(DiscriminatedUnionSchema),
    Intersection(Schema, Schema),
    Lazy(LazySchema),
    Function(FunctionSchema),
    Instance {
        type_id: TypeId,
        type_name: &'static str,
    },
    Promise(Schema),
    Optional(Schema),
    Nullable(Schema),
    Preprocess {
        f: PreprocessFn,
        inner: Schema,
    },
}

impl Kind {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Kind::String(_) => "string",
            Kind::Number(_) => "number",
            Kind::BigInt(_) => "bigint",
            Kind::Boolean { .. } => "boolean",
            Kind::Date(_) => "date",
            Kind::Symbol => "symbol",
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Void => "void",
            Kind::Any => "any",
            Kind::Unknown => "unknown",
            Kind::Never => "never",
            Kind::Literal(_) => "literal",
            Kind::Enum(_) => "enum",
            Kind::NativeEnum(_) => "nativeEnum",
            Kind::Object(_) => "object",
            Kind::Array(_) => "array",
            Kind::Tuple(_) => "tuple",
            Kind::Set(_) => "set",
            Kind::Record { .. } => "record",
            Kind::Map { .. } => "map",
            Kind::Union(_) => "union",
            Kind::DiscriminatedUnion(_) => "discriminatedUnion",
            Kind::Intersection(..) => "intersection",
            Kind::Lazy(_) => "lazy",
            Kind::Function(_) => "function",
            Kind::Instance { .. } => "instance",
            Kind::Promise(_) => "promise",
            Kind::Optional(_) => "optional",
            Kind::Nullable(_) => "nullable",
            Kind::Preprocess { .. } => "preprocess",
        }
    }
}

impl Schema {
    pub(crate) fn from_kind(kind: Kind) -> Self {
        Schema(Arc::new(Node {
            kind,
            steps: Vec::new(),
            description: None,
            anchor: None,
        }))
    }

    pub(crate) fn node(&self) -> &Node {
        &self.0
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.0.kind
    }

    /// New schema with `step` appended to the pipeline.
    pub(crate) fn with_step(&self, step: Step) -> Schema {
        let mut node = (*self.0).clone();
        node.steps.push(step);
        Schema(Arc::new(node))
    }

    /// Name of the base kind, e.g. `"object"` or `"union"`.
    pub fn kind_name(&self) -> &'static str {
        self.0.kind.name()
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    /// Accepts the absent value without failing.
    pub fn is_optional(&self) -> bool {
        let accepts_undefined = match &self.0.kind {
            Kind::Optional(_) | Kind::Any | Kind::Unknown | Kind::Undefined | Kind::Void => true,
            Kind::Literal(Literal::Undefined) => true,
            Kind::Nullable(inner) => inner.is_optional(),
            _ => false,
        };
        accepts_undefined || self.0.steps.iter().any(|s| matches!(s, Step::Default(_)))
    }

    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Same node, additionally owning `anchor`.
    pub(crate) fn anchored(&self, anchor: Anchor) -> Schema {
        let mut node = (*self.0).clone();
        node.anchor = Some(anchor);
        Schema(Arc::new(node))
    }

    pub(crate) fn with_description(&self, text: String) -> Schema {
        let mut node = (*self.0).clone();
        node.description = Some(text);
        Schema(Arc::new(node))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.kind_name())
            .field("steps", &self.0.steps.len())
            .field("description", &self.0.description)
            .finish()
    }
}

/// A primitive value matched by strict equality.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Symbol(Symbol),
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Undefined => Value::Undefined,
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::BigInt(i) => Value::BigInt(*i),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Symbol(s) => Value::Symbol(s.clone()),
        }
    }

    /// Strict equality against a runtime value. NaN matches nothing.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Undefined, Value::Undefined) => true,
            (Literal::Null, Value::Null) => true,
            (Literal::Bool(a), Value::Bool(b)) => a == b,
            (Literal::Number(a), Value::Number(b)) => a == b,
            (Literal::BigInt(a), Value::BigInt(b)) => a == b,
            (Literal::String(a), Value::String(b)) => a == b,
            (Literal::Symbol(a), Value::Symbol(b)) => a == b,
            _ => false,
        }
    }

    pub(crate) fn key(&self) -> LiteralKey {
        match self {
            Literal::Undefined => LiteralKey::Undefined,
            Literal::Null => LiteralKey::Null,
            Literal::Bool(b) => LiteralKey::Bool(*b),
            Literal::Number(n) => LiteralKey::number(*n),
            Literal::BigInt(i) => LiteralKey::BigInt(*i),
            Literal::String(s) => LiteralKey::String(s.clone()),
            Literal::Symbol(s) => LiteralKey::Symbol(s.id()),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Number(f64::from(n))
    }
}

impl From<i128> for Literal {
    fn from(n: i128) -> Self {
        Literal::BigInt(n)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<Symbol> for Literal {
    fn from(s: Symbol) -> Self {
        Literal::Symbol(s)
    }
}

/// Hashable identity of a literal, used for discriminator lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum LiteralKey {
    Undefined,
    Null,
    Bool(bool),
    /// Bit pattern, with `-0.0` folded into `0.0`
    Number(u64),
    BigInt(i128),
    String(String),
    Symbol(u64),
}

impl LiteralKey {
    fn number(n: f64) -> Self {
        let n = if n == 0.0 { 0.0 } else { n };
        LiteralKey::Number(n.to_bits())
    }

    /// Key of a runtime value, if it is a primitive that can be a tag.
    pub(crate) fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Undefined => Some(LiteralKey::Undefined),
            Value::Null => Some(LiteralKey::Null),
            Value::Bool(b) => Some(LiteralKey::Bool(*b)),
            Value::Number(n) if n.is_nan() => None,
            Value::Number(n) => Some(LiteralKey::number(*n)),
            Value::BigInt(i) => Some(LiteralKey::BigInt(*i)),
            Value::String(s) => Some(LiteralKey::String(s.clone())),
            Value::Symbol(s) => Some(LiteralKey::Symbol(s.id())),
            _ => None,
        }
    }
}
