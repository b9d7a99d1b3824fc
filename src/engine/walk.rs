//! The validation walk
//!
//! One recursive function serves both synchronous and asynchronous
//! parses. Each node returns either its output value or the issues found
//! beneath it, with paths relative to the node; parents prepend their
//! own segment while collecting.

use futures_util::future::{BoxFuture, FutureExt};

use super::coerce::{self, DateCoercion};
use super::context::ParseContext;
use super::function::{validated_function, validated_promise};
use super::leaf;
use super::merge::merge_values;
use super::pipeline::run_steps;
use crate::issue::{join_values, Bound, Issue, IssueKind, PathSegment, SizeOrigin};
use crate::schema::{
    ArraySchema, DiscriminatedUnionSchema, Kind, ObjectSchema, Schema, SetSchema, Step,
    TupleSchema, UnknownKeys,
};
use crate::value::{Object, Value};

/// Output of one node: the value it produced, or every issue beneath it.
pub(crate) type Checked = Result<Value, Vec<Issue>>;

fn invalid_type(expected: &str, value: &Value) -> Vec<Issue> {
    vec![Issue::new(IssueKind::InvalidType {
        expected: expected.to_string(),
        received: value.kind(),
    })]
}

fn prefixed(issues: Vec<Issue>, segment: impl Into<PathSegment>) -> Vec<Issue> {
    let segment = segment.into();
    issues
        .into_iter()
        .map(|issue| issue.with_prepended_path(segment.clone()))
        .collect()
}

fn finish(output: Value, issues: Vec<Issue>) -> Checked {
    if issues.is_empty() {
        Ok(output)
    } else {
        Err(issues)
    }
}

/// Validates `value` against `schema` and runs its pipeline.
///
/// An absent input with a default attached takes the last default and
/// skips the base rule; only steps attached after that default run.
pub(crate) fn walk<'a>(schema: &'a Schema, value: Value, ctx: &'a ParseContext) -> BoxFuture<'a, Checked> {
    async move {
        let node = schema.node();
        let default = node.steps.iter().enumerate().rev().find_map(|(i, step)| match step {
            Step::Default(f) => Some((i, f)),
            _ => None,
        });

        let (value, steps) = match default {
            Some((at, produce)) if value.is_undefined() => (produce(), &node.steps[at + 1..]),
            _ => (walk_kind(&node.kind, value, ctx).await?, &node.steps[..]),
        };
        run_steps(steps, value, ctx).await
    }
    .boxed()
}

async fn walk_kind(kind: &Kind, value: Value, ctx: &ParseContext) -> Checked {
    match kind {
        Kind::String(schema) => {
            let value = if schema.coerce { coerce::to_string(value) } else { value };
            match value {
                Value::String(s) => leaf::check_string(schema, s)
                    .map(Value::String)
                    .map_err(|issue| vec![issue]),
                other => Err(invalid_type("string", &other)),
            }
        }
        Kind::Number(schema) => {
            let value = if schema.coerce { coerce::to_number(value) } else { value };
            match value {
                Value::Number(n) if !n.is_nan() => leaf::check_number(schema, n)
                    .map(Value::Number)
                    .map_err(|issue| vec![issue]),
                other => Err(invalid_type("number", &other)),
            }
        }
        Kind::BigInt(schema) => {
            let value = if schema.coerce { coerce::to_bigint(value) } else { value };
            match value {
                Value::BigInt(n) => leaf::check_bigint(schema, n)
                    .map(Value::BigInt)
                    .map_err(|issue| vec![issue]),
                other => Err(invalid_type("bigint", &other)),
            }
        }
        Kind::Boolean { coerce } => {
            let value = if *coerce { coerce::to_boolean(value) } else { value };
            match value {
                Value::Bool(b) => Ok(Value::Bool(b)),
                other => Err(invalid_type("boolean", &other)),
            }
        }
        Kind::Date(schema) => {
            let value = if schema.coerce {
                match coerce::to_date(value) {
                    DateCoercion::Date(d) => Value::Date(d),
                    DateCoercion::Invalid => return Err(vec![Issue::new(IssueKind::InvalidDate)]),
                    DateCoercion::Unchanged(v) => v,
                }
            } else {
                value
            };
            match value {
                Value::Date(d) => leaf::check_date(schema, d)
                    .map(Value::Date)
                    .map_err(|issue| vec![issue]),
                other => Err(invalid_type("date", &other)),
            }
        }
        Kind::Symbol => match value {
            Value::Symbol(_) => Ok(value),
            other => Err(invalid_type("symbol", &other)),
        },
        Kind::Undefined => match value {
            Value::Undefined => Ok(value),
            other => Err(invalid_type("undefined", &other)),
        },
        Kind::Null => match value {
            Value::Null => Ok(value),
            other => Err(invalid_type("null", &other)),
        },
        Kind::Void => match value {
            Value::Undefined => Ok(value),
            other => Err(invalid_type("void", &other)),
        },
        Kind::Any | Kind::Unknown => Ok(value),
        Kind::Never => Err(invalid_type("never", &value)),
        Kind::Literal(literal) => {
            if literal.matches(&value) {
                Ok(value)
            } else {
                Err(vec![Issue::new(IssueKind::InvalidLiteral {
                    expected: literal.to_value(),
                    received: value,
                })])
            }
        }
        Kind::Enum(schema) => {
            if matches!(&value, Value::String(s) if schema.contains(s)) {
                return Ok(value);
            }
            match value {
                Value::String(_) => Err(vec![Issue::new(IssueKind::InvalidEnumValue {
                    options: schema.option_values(),
                    received: value,
                })]),
                other => Err(invalid_type(&join_values(&schema.option_values()), &other)),
            }
        }
        Kind::NativeEnum(schema) => {
            if schema.accepts(&value) {
                return Ok(value);
            }
            let options = schema.option_values();
            match value {
                Value::String(_) | Value::Number(_) => {
                    Err(vec![Issue::new(IssueKind::InvalidEnumValue {
                        options,
                        received: value,
                    })])
                }
                other => Err(invalid_type(&join_values(&options), &other)),
            }
        }
        Kind::Object(schema) => walk_object(schema, value, ctx).await,
        Kind::Array(schema) => walk_array(schema, value, ctx).await,
        Kind::Tuple(schema) => walk_tuple(schema, value, ctx).await,
        Kind::Set(schema) => walk_set(schema, value, ctx).await,
        Kind::Record { key, value: item } => walk_record(key, item, value, ctx).await,
        Kind::Map { key, value: item } => walk_map(key, item, value, ctx).await,
        Kind::Union(variants) => walk_union(variants, value, ctx).await,
        Kind::DiscriminatedUnion(schema) => walk_discriminated(schema, value, ctx).await,
        Kind::Intersection(left, right) => walk_intersection(left, right, value, ctx).await,
        Kind::Lazy(lazy) => {
            let resolved = lazy.schema();
            walk(&resolved, value, ctx).await
        }
        Kind::Function(schema) => match value {
            Value::Function(f) => Ok(Value::Function(validated_function(schema.clone(), f))),
            other => Err(invalid_type("function", &other)),
        },
        Kind::Instance { type_id, type_name } => {
            if matches!(&value, Value::Opaque(o) if o.value_type_id() == *type_id) {
                return Ok(value);
            }
            let name: &str = type_name;
            let short = name.rsplit("::").next().unwrap_or(name);
            let message = format!("Input not instance of {}", short);
            Err(vec![Issue::new(IssueKind::custom()).with_message(Some(message.as_str()))])
        }
        Kind::Promise(inner) => match value {
            Value::Promise(p) => Ok(Value::Promise(validated_promise(inner.clone(), p))),
            other => Err(invalid_type("promise", &other)),
        },
        Kind::Optional(inner) => match value {
            Value::Undefined => Ok(value),
            other => walk(inner, other, ctx).await,
        },
        Kind::Nullable(inner) => match value {
            Value::Null => Ok(value),
            other => walk(inner, other, ctx).await,
        },
        Kind::Preprocess { f, inner } => walk(inner, f(value), ctx).await,
    }
}

async fn walk_object(schema: &ObjectSchema, value: Value, ctx: &ParseContext) -> Checked {
    let mut input = match value {
        Value::Object(map) => map,
        other => return Err(invalid_type("object", &other)),
    };
    let mut output = Object::new();
    let mut issues = Vec::new();

    for (key, field) in &schema.shape {
        let present = input.contains_key(key);
        let raw = input.remove(key).unwrap_or(Value::Undefined);
        match walk(field, raw, ctx).await {
            Ok(v) => {
                if present || !v.is_undefined() {
                    output.insert(key.clone(), v);
                }
            }
            Err(found) => issues.extend(prefixed(found, key.as_str())),
        }
        if ctx.is_halted() {
            return Err(issues);
        }
    }

    // `input` now holds only the keys the shape does not declare
    if let Some(catchall) = &schema.catchall {
        for (key, raw) in input {
            match walk(catchall, raw, ctx).await {
                Ok(v) => {
                    output.insert(key, v);
                }
                Err(found) => issues.extend(prefixed(found, key)),
            }
            if ctx.is_halted() {
                return Err(issues);
            }
        }
    } else {
        match schema.unknown_keys {
            UnknownKeys::Passthrough => output.extend(input),
            UnknownKeys::Strip => {}
            UnknownKeys::Strict => {
                if !input.is_empty() {
                    issues.push(Issue::new(IssueKind::UnrecognizedKeys {
                        keys: input.into_keys().collect(),
                    }));
                }
            }
        }
    }

    finish(Value::Object(output), issues)
}

/// Validates each element against `schema`, keyed by index.
async fn walk_elements(
    schema: &Schema,
    items: Vec<Value>,
    ctx: &ParseContext,
    issues: &mut Vec<Issue>,
) -> Vec<Value> {
    let mut output = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match walk(schema, item, ctx).await {
            Ok(v) => output.push(v),
            Err(found) => issues.extend(prefixed(found, index)),
        }
        if ctx.is_halted() {
            break;
        }
    }
    output
}

async fn walk_array(schema: &ArraySchema, value: Value, ctx: &ParseContext) -> Checked {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(invalid_type("array", &other)),
    };
    let mut issues = Vec::new();
    if let Err(issue) = leaf::check_size(&schema.checks, items.len(), SizeOrigin::Array) {
        issues.push(issue);
    }
    let output = walk_elements(&schema.element, items, ctx, &mut issues).await;
    finish(Value::Array(output), issues)
}

async fn walk_set(schema: &SetSchema, value: Value, ctx: &ParseContext) -> Checked {
    let members = match value {
        Value::Set(members) => members,
        other => return Err(invalid_type("set", &other)),
    };
    let mut issues = Vec::new();
    if let Err(issue) = leaf::check_size(&schema.checks, members.len(), SizeOrigin::Set) {
        issues.push(issue);
    }
    let output = walk_elements(&schema.element, members, ctx, &mut issues).await;
    finish(Value::set(output), issues)
}

async fn walk_tuple(schema: &TupleSchema, value: Value, ctx: &ParseContext) -> Checked {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(invalid_type("array", &other)),
    };
    let expected = schema.items.len();
    if items.len() < expected {
        return Err(vec![Issue::new(IssueKind::TooSmall {
            origin: SizeOrigin::Array,
            minimum: Bound::Number(expected as f64),
            inclusive: true,
            exact: false,
        })]);
    }
    if schema.rest.is_none() && items.len() > expected {
        return Err(vec![Issue::new(IssueKind::TooBig {
            origin: SizeOrigin::Array,
            maximum: Bound::Number(expected as f64),
            inclusive: true,
            exact: false,
        })]);
    }

    let mut output = Vec::with_capacity(items.len());
    let mut issues = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        let Some(element) = schema.items.get(index).or(schema.rest.as_ref()) else {
            break;
        };
        match walk(element, item, ctx).await {
            Ok(v) => output.push(v),
            Err(found) => issues.extend(prefixed(found, index)),
        }
        if ctx.is_halted() {
            break;
        }
    }
    finish(Value::Array(output), issues)
}

async fn walk_record(key_schema: &Schema, item: &Schema, value: Value, ctx: &ParseContext) -> Checked {
    let input = match value {
        Value::Object(map) => map,
        other => return Err(invalid_type("object", &other)),
    };
    let mut output = Object::new();
    let mut issues = Vec::new();

    for (key, raw) in input {
        let checked_key = walk(key_schema, Value::String(key.clone()), ctx).await;
        if ctx.is_halted() {
            issues.extend(prefixed(checked_key.err().unwrap_or_default(), key));
            return Err(issues);
        }
        let checked_value = walk(item, raw, ctx).await;

        match (checked_key, checked_value) {
            (Ok(k), Ok(v)) => {
                let out_key = match k {
                    Value::String(s) => s,
                    _ => key,
                };
                output.insert(out_key, v);
            }
            (k, v) => {
                let mut found = k.err().unwrap_or_default();
                found.extend(v.err().unwrap_or_default());
                issues.extend(prefixed(found, key));
            }
        }
        if ctx.is_halted() {
            return Err(issues);
        }
    }

    finish(Value::Object(output), issues)
}

async fn walk_map(key_schema: &Schema, item: &Schema, value: Value, ctx: &ParseContext) -> Checked {
    let entries = match value {
        Value::Map(entries) => entries,
        other => return Err(invalid_type("map", &other)),
    };
    let mut output = Vec::with_capacity(entries.len());
    let mut issues = Vec::new();

    for (index, (raw_key, raw_value)) in entries.into_iter().enumerate() {
        let checked_key = walk(key_schema, raw_key, ctx).await;
        let checked_value = if ctx.is_halted() {
            Err(Vec::new())
        } else {
            walk(item, raw_value, ctx).await
        };
        match (checked_key, checked_value) {
            (Ok(k), Ok(v)) => output.push((k, v)),
            (k, v) => {
                let mut found = prefixed(k.err().unwrap_or_default(), "key");
                found.extend(prefixed(v.err().unwrap_or_default(), "value"));
                issues.extend(prefixed(found, index));
            }
        }
        if ctx.is_halted() {
            return Err(issues);
        }
    }

    finish(Value::map(output), issues)
}

/// First variant that accepts wins. When none does, the failure keeps
/// every variant's issues in declaration order.
async fn walk_union(variants: &[Schema], value: Value, ctx: &ParseContext) -> Checked {
    let mut union_errors = Vec::with_capacity(variants.len());
    for variant in variants {
        match walk(variant, value.clone(), ctx).await {
            Ok(v) => return Ok(v),
            Err(found) => {
                if ctx.is_halted() {
                    return Err(found);
                }
                union_errors.push(found);
            }
        }
    }
    Err(vec![Issue::new(IssueKind::InvalidUnion { union_errors })])
}

async fn walk_discriminated(
    schema: &DiscriminatedUnionSchema,
    value: Value,
    ctx: &ParseContext,
) -> Checked {
    let tag = match &value {
        Value::Object(map) => map.get(&schema.discriminator).cloned().unwrap_or(Value::Undefined),
        other => return Err(invalid_type("object", other)),
    };
    match schema.select(&tag) {
        Some(variant) => walk(variant, value, ctx).await,
        None => Err(vec![Issue::new(IssueKind::InvalidDiscriminator {
            options: schema.tag_values(),
        })
        .with_prepended_path(schema.discriminator.as_str())]),
    }
}

async fn walk_intersection(left: &Schema, right: &Schema, value: Value, ctx: &ParseContext) -> Checked {
    let checked_left = walk(left, value.clone(), ctx).await;
    if ctx.is_halted() {
        return Err(checked_left.err().unwrap_or_default());
    }
    let checked_right = walk(right, value, ctx).await;

    match (checked_left, checked_right) {
        (Ok(a), Ok(b)) => {
            merge_values(a, b).ok_or_else(|| vec![Issue::new(IssueKind::InvalidIntersectionTypes)])
        }
        (a, b) => {
            let mut issues = a.err().unwrap_or_default();
            issues.extend(b.err().unwrap_or_default());
            Err(issues)
        }
    }
}
