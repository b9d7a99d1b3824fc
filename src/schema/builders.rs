//! Schema constructors
//!
//! Scalar and collection builders return their typed builder so that
//! constraints can be chained; everything else returns a `Schema`.

use std::any::{Any, TypeId};
use std::sync::Arc;

use super::choice::{DiscriminatedUnionSchema, EnumSchema, NativeEnumSchema};
use super::collections::{ArraySchema, SetSchema, TupleSchema};
use super::errors::SchemaBuildError;
use super::function::FunctionSchema;
use super::lazy::LazySchema;
use super::object::{ObjectSchema, UnknownKeys};
use super::primitives::{BigIntSchema, DateSchema, NumberSchema, StringSchema};
use super::types::{Kind, Literal, Schema};
use crate::value::Value;

pub fn string() -> StringSchema {
    StringSchema::default()
}

pub fn number() -> NumberSchema {
    NumberSchema::default()
}

pub fn bigint() -> BigIntSchema {
    BigIntSchema::default()
}

pub fn boolean() -> Schema {
    Schema::from_kind(Kind::Boolean { coerce: false })
}

pub fn date() -> DateSchema {
    DateSchema::default()
}

pub fn symbol() -> Schema {
    Schema::from_kind(Kind::Symbol)
}

pub fn undefined() -> Schema {
    Schema::from_kind(Kind::Undefined)
}

pub fn null() -> Schema {
    Schema::from_kind(Kind::Null)
}

/// Accepts only the absent value.
pub fn void() -> Schema {
    Schema::from_kind(Kind::Void)
}

pub fn any() -> Schema {
    Schema::from_kind(Kind::Any)
}

pub fn unknown() -> Schema {
    Schema::from_kind(Kind::Unknown)
}

/// Rejects every value.
pub fn never() -> Schema {
    Schema::from_kind(Kind::Never)
}

pub fn literal(value: impl Into<Literal>) -> Schema {
    Schema::from_kind(Kind::Literal(value.into()))
}

/// Enum of strings. Named `enum_of` because `enum` is reserved.
pub fn enum_of<I, S>(values: I) -> EnumSchema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumSchema::new(values)
}

pub fn native_enum<I, K, L>(entries: I) -> NativeEnumSchema
where
    I: IntoIterator<Item = (K, L)>,
    K: Into<String>,
    L: Into<Literal>,
{
    NativeEnumSchema::new(entries)
}

/// Object that passes unknown keys through.
pub fn object<I, K, S>(shape: I) -> ObjectSchema
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<String>,
    S: Into<Schema>,
{
    ObjectSchema::new(shape)
}

/// Object that reports unknown keys.
pub fn strict_object<I, K, S>(shape: I) -> ObjectSchema
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<String>,
    S: Into<Schema>,
{
    let mut object = ObjectSchema::new(shape);
    object.unknown_keys = UnknownKeys::Strict;
    object
}

pub fn array(element: impl Into<Schema>) -> ArraySchema {
    ArraySchema::new(element.into())
}

pub fn tuple<I, S>(items: I) -> TupleSchema
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    TupleSchema::new(items.into_iter().map(Into::into).collect())
}

pub fn set(element: impl Into<Schema>) -> SetSchema {
    SetSchema::new(element.into())
}

/// Object with arbitrary keys; each key is validated as a string against
/// `key`, each value against `value`.
pub fn record(key: impl Into<Schema>, value: impl Into<Schema>) -> Schema {
    Schema::from_kind(Kind::Record {
        key: key.into(),
        value: value.into(),
    })
}

pub fn map(key: impl Into<Schema>, value: impl Into<Schema>) -> Schema {
    Schema::from_kind(Kind::Map {
        key: key.into(),
        value: value.into(),
    })
}

/// First variant that accepts the input wins.
pub fn union<I, S>(variants: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    Schema::from_kind(Kind::Union(
        variants.into_iter().map(Into::into).collect(),
    ))
}

/// Union of object schemas selected by the literal value at `key`.
pub fn discriminated_union<I, S>(
    key: impl Into<String>,
    variants: I,
) -> Result<DiscriminatedUnionSchema, SchemaBuildError>
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    DiscriminatedUnionSchema::new(
        key.into(),
        variants.into_iter().map(Into::into).collect(),
    )
}

/// Value must satisfy both; outputs are deep-merged.
pub fn intersection(left: impl Into<Schema>, right: impl Into<Schema>) -> Schema {
    Schema::from_kind(Kind::Intersection(left.into(), right.into()))
}

/// Defers building the schema until first use.
pub fn lazy<F>(thunk: F) -> Schema
where
    F: Fn() -> Schema + Send + Sync + 'static,
{
    LazySchema::new(thunk).into()
}

pub fn function() -> FunctionSchema {
    FunctionSchema::new()
}

/// Accepts opaque host values of type `T`.
pub fn instance_of<T: Any>() -> Schema {
    Schema::from_kind(Kind::Instance {
        type_id: TypeId::of::<T>(),
        type_name: std::any::type_name::<T>(),
    })
}

/// Accepts a promise; the output promise validates the settled value.
pub fn promise(inner: impl Into<Schema>) -> Schema {
    Schema::from_kind(Kind::Promise(inner.into()))
}

pub fn optional(inner: impl Into<Schema>) -> Schema {
    Schema::from_kind(Kind::Optional(inner.into()))
}

pub fn nullable(inner: impl Into<Schema>) -> Schema {
    Schema::from_kind(Kind::Nullable(inner.into()))
}

/// Runs `f` on the raw input before validating against `inner`.
pub fn preprocess<F>(f: F, inner: impl Into<Schema>) -> Schema
where
    F: Fn(Value) -> Value + Send + Sync + 'static,
{
    Schema::from_kind(Kind::Preprocess {
        f: Arc::new(f),
        inner: inner.into(),
    })
}

/// Builders that convert the input before the type check.
pub mod coerce {
    use super::*;

    /// `String(input)`
    pub fn string() -> StringSchema {
        StringSchema::coerced()
    }

    /// `Number(input)`; unparseable input becomes NaN and fails.
    pub fn number() -> NumberSchema {
        NumberSchema::coerced()
    }

    /// Truthiness of the input
    pub fn boolean() -> Schema {
        Schema::from_kind(Kind::Boolean { coerce: true })
    }

    /// Integer strings and integral numbers
    pub fn bigint() -> BigIntSchema {
        BigIntSchema::coerced()
    }

    /// RFC 3339 / `YYYY-MM-DD` strings and epoch milliseconds
    pub fn date() -> DateSchema {
        DateSchema::coerced()
    }
}
