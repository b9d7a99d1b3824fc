//! Compiles documents into schemas

use std::collections::HashMap;
use std::sync::{RwLock, Weak};

use chrono::{DateTime, Utc};
use regex::Regex;

use super::document::{NodeDoc, UnknownKeysDoc};
use super::errors::LoaderError;
use crate::issue::IssueKind;
use crate::schema::{
    self, CustomIssue, IpVersion, LazySchema, Literal, Schema, SchemaExt, StringSchema,
};
use crate::value::Value;

/// Compiled schemas by name, shared with the lazy references into it.
pub(crate) type Table = RwLock<HashMap<String, Schema>>;

/// Compiles nodes of one named document.
pub(crate) struct Compiler<'a> {
    document: &'a str,
    table: Weak<Table>,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(document: &'a str, table: Weak<Table>) -> Self {
        Self { document, table }
    }

    fn invalid(&self, reason: impl Into<String>) -> LoaderError {
        LoaderError::invalid(self.document, reason)
    }

    pub(crate) fn compile(&self, node: &NodeDoc) -> Result<Schema, LoaderError> {
        let schema = match node {
            NodeDoc::String {
                coerce,
                trim,
                lowercase,
                uppercase,
                min,
                max,
                length,
                format,
                pattern,
                includes,
                starts_with,
                ends_with,
                message,
            } => {
                let mut s = if *coerce {
                    schema::coerce::string()
                } else {
                    schema::string()
                };
                if *trim {
                    s = s.trim();
                }
                if *lowercase {
                    s = s.to_lowercase();
                }
                if *uppercase {
                    s = s.to_uppercase();
                }
                if let Some(n) = min {
                    s = s.min(*n);
                }
                if let Some(n) = max {
                    s = s.max(*n);
                }
                if let Some(n) = length {
                    s = s.length(*n);
                }
                if let Some(name) = format {
                    s = self.string_format(s, name)?;
                }
                if let Some(source) = pattern {
                    let re = Regex::new(source)
                        .map_err(|e| self.invalid(format!("bad pattern '{}': {}", source, e)))?;
                    s = s.regex(re);
                }
                if let Some(needle) = includes {
                    s = s.includes(needle.as_str());
                }
                if let Some(prefix) = starts_with {
                    s = s.starts_with(prefix.as_str());
                }
                if let Some(suffix) = ends_with {
                    s = s.ends_with(suffix.as_str());
                }
                if let Some(text) = message {
                    s = s.message(text.as_str());
                }
                s.into()
            }
            NodeDoc::Number {
                coerce,
                min,
                max,
                gt,
                lt,
                int,
                multiple_of,
                finite,
                message,
            } => {
                let mut n = if *coerce {
                    schema::coerce::number()
                } else {
                    schema::number()
                };
                if *int {
                    n = n.int();
                }
                if let Some(v) = gt {
                    n = n.gt(*v);
                }
                if let Some(v) = min {
                    n = n.min(*v);
                }
                if let Some(v) = lt {
                    n = n.lt(*v);
                }
                if let Some(v) = max {
                    n = n.max(*v);
                }
                if let Some(v) = multiple_of {
                    n = n.multiple_of(*v);
                }
                if *finite {
                    n = n.finite();
                }
                if let Some(text) = message {
                    n = n.message(text.as_str());
                }
                n.into()
            }
            NodeDoc::Bigint {
                coerce,
                min,
                max,
                multiple_of,
            } => {
                let mut b = if *coerce {
                    schema::coerce::bigint()
                } else {
                    schema::bigint()
                };
                if let Some(v) = min {
                    b = b.min(i128::from(*v));
                }
                if let Some(v) = max {
                    b = b.max(i128::from(*v));
                }
                if let Some(v) = multiple_of {
                    b = b.multiple_of(i128::from(*v));
                }
                b.into()
            }
            NodeDoc::Boolean { coerce } => {
                if *coerce {
                    schema::coerce::boolean()
                } else {
                    schema::boolean()
                }
            }
            NodeDoc::Date { coerce, min, max } => {
                let mut d = if *coerce {
                    schema::coerce::date()
                } else {
                    schema::date()
                };
                if let Some(at) = min {
                    d = d.min(self.instant(at)?);
                }
                if let Some(at) = max {
                    d = d.max(self.instant(at)?);
                }
                d.into()
            }
            NodeDoc::Null => schema::null(),
            NodeDoc::Undefined => schema::undefined(),
            NodeDoc::Any => schema::any(),
            NodeDoc::Unknown => schema::unknown(),
            NodeDoc::Never => schema::never(),
            NodeDoc::Literal { value } => schema::literal(self.literal(value)?),
            NodeDoc::Enum { values } => {
                if values.is_empty() {
                    return Err(self.invalid("enum needs at least one value"));
                }
                schema::enum_of(values.iter().cloned()).into()
            }
            NodeDoc::Object {
                properties,
                unknown_keys,
                catchall,
            } => {
                let shape = properties
                    .iter()
                    .map(|(key, node)| Ok((key.clone(), self.compile(node)?)))
                    .collect::<Result<Vec<(String, Schema)>, LoaderError>>()?;
                let object = schema::object(shape);
                let object = match unknown_keys {
                    UnknownKeysDoc::Passthrough => object,
                    UnknownKeysDoc::Strip => object.strip(),
                    UnknownKeysDoc::Strict => object.strict(),
                };
                match catchall {
                    Some(node) => object.catchall(self.compile(node)?).into(),
                    None => object.into(),
                }
            }
            NodeDoc::Array {
                items,
                min,
                max,
                length,
                nonempty,
            } => {
                let mut a = schema::array(self.compile(items)?);
                if *nonempty {
                    a = a.nonempty();
                }
                if let Some(n) = min {
                    a = a.min(*n);
                }
                if let Some(n) = max {
                    a = a.max(*n);
                }
                if let Some(n) = length {
                    a = a.length(*n);
                }
                a.into()
            }
            NodeDoc::Tuple { items, rest } => {
                let t = schema::tuple(self.compile_all(items)?);
                match rest {
                    Some(node) => t.rest(self.compile(node)?).into(),
                    None => t.into(),
                }
            }
            NodeDoc::Set { items, min, max } => {
                let mut s = schema::set(self.compile(items)?);
                if let Some(n) = min {
                    s = s.min(*n);
                }
                if let Some(n) = max {
                    s = s.max(*n);
                }
                s.into()
            }
            NodeDoc::Record { key, value } => {
                let key = match key {
                    Some(node) => self.compile(node)?,
                    None => schema::string().into(),
                };
                schema::record(key, self.compile(value)?)
            }
            NodeDoc::Map { key, value } => schema::map(self.compile(key)?, self.compile(value)?),
            NodeDoc::Union { variants } => schema::union(self.compile_all(variants)?),
            NodeDoc::DiscriminatedUnion {
                discriminator,
                variants,
            } => schema::discriminated_union(discriminator.as_str(), self.compile_all(variants)?)
                .map_err(|e| self.invalid(e.to_string()))?
                .into(),
            NodeDoc::Intersection { left, right } => {
                schema::intersection(self.compile(left)?, self.compile(right)?)
            }
            NodeDoc::Optional { inner } => self.compile(inner)?.optional(),
            NodeDoc::Nullable { inner } => self.compile(inner)?.nullable(),
            NodeDoc::Default { inner, value } => {
                self.compile(inner)?.with_default(Value::from(value.clone()))
            }
            NodeDoc::Ref { name } => self.reference(name),
        };
        Ok(schema)
    }

    fn compile_all(&self, nodes: &[NodeDoc]) -> Result<Vec<Schema>, LoaderError> {
        nodes.iter().map(|node| self.compile(node)).collect()
    }

    fn string_format(&self, s: StringSchema, name: &str) -> Result<StringSchema, LoaderError> {
        let s = match name {
            "email" => s.email(),
            "url" => s.url(),
            "uuid" => s.uuid(),
            "emoji" => s.emoji(),
            "nanoid" => s.nanoid(),
            "cuid" => s.cuid(),
            "cuid2" => s.cuid2(),
            "ulid" => s.ulid(),
            "datetime" => s.datetime(),
            "date" => s.date(),
            "time" => s.time(),
            "duration" => s.duration(),
            "ip" => s.ip(),
            "ipv4" => s.ip_version(IpVersion::V4),
            "ipv6" => s.ip_version(IpVersion::V6),
            "base64" => s.base64(),
            "base64url" => s.base64url(),
            other => return Err(self.invalid(format!("unknown string format '{}'", other))),
        };
        Ok(s)
    }

    fn instant(&self, text: &str) -> Result<DateTime<Utc>, LoaderError> {
        DateTime::parse_from_rfc3339(text)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| self.invalid(format!("bad date bound '{}': {}", text, e)))
    }

    fn literal(&self, value: &serde_json::Value) -> Result<Literal, LoaderError> {
        match value {
            serde_json::Value::Null => Ok(Literal::Null),
            serde_json::Value::Bool(b) => Ok(Literal::Bool(*b)),
            serde_json::Value::String(s) => Ok(Literal::String(s.clone())),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Literal::Number)
                .ok_or_else(|| self.invalid(format!("literal {} is not representable", n))),
            other => Err(self.invalid(format!("literal must be a primitive, got {}", other))),
        }
    }

    /// A reference looked up in the table on every use. The table owns
    /// the referring schema, so the reference only holds it weakly.
    fn reference(&self, name: &str) -> Schema {
        let table = self.table.clone();
        let name = name.to_string();
        LazySchema::uncached(move || resolve(&table, &name)).into()
    }
}

/// Looks up `name`. An entry that can no longer be reached fails every
/// parse with a configuration error.
fn resolve(table: &Weak<Table>, name: &str) -> Schema {
    let found = table.upgrade().and_then(|table| {
        let guard = table.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.get(name).cloned()
    });
    found.unwrap_or_else(|| unreachable_reference(name))
}

fn unreachable_reference(name: &str) -> Schema {
    let reason = format!("schema reference '{}' is no longer registered", name);
    schema::unknown().super_refine(move |_| {
        vec![CustomIssue::of(IssueKind::ConfigurationError {
            reason: reason.clone(),
        })]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueCode;
    use serde_json::json;
    use std::sync::Arc;

    fn compile(node: serde_json::Value) -> Result<Schema, LoaderError> {
        let doc: NodeDoc = serde_json::from_value(node).unwrap();
        let table = Arc::new(Table::default());
        Compiler::new("test", Arc::downgrade(&table)).compile(&doc)
    }

    #[test]
    fn test_string_checks() {
        let schema = compile(json!({ "type": "string", "trim": true, "min": 2, "format": "email" }))
            .unwrap();
        assert_eq!(
            schema.parse(" a@b.io ").unwrap(),
            Value::from("a@b.io")
        );
        let issues = schema.safe_parse("x").issues().to_vec();
        assert_eq!(issues[0].code(), IssueCode::TooSmall);
    }

    #[test]
    fn test_object_policy_and_default() {
        let schema = compile(json!({
            "type": "object",
            "properties": {
                "role": { "type": "default", "inner": { "type": "enum", "values": ["admin", "user"] }, "value": "user" }
            },
            "unknown_keys": "strict"
        }))
        .unwrap();
        assert_eq!(
            schema.parse(Value::object(Vec::<(String, Value)>::new())).unwrap(),
            Value::object([("role", Value::from("user"))])
        );
        let result = schema.safe_parse(Value::object([("extra", Value::from(1))]));
        assert_eq!(result.issues()[0].code(), IssueCode::UnrecognizedKeys);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = compile(json!({ "type": "string", "format": "isbn" })).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidDocument { .. }));
    }

    #[test]
    fn test_bad_pattern_is_rejected() {
        assert!(compile(json!({ "type": "string", "pattern": "(" })).is_err());
    }

    #[test]
    fn test_discriminated_union_errors_surface() {
        let err = compile(json!({
            "type": "discriminated_union",
            "discriminator": "kind",
            "variants": [{ "type": "number" }]
        }))
        .unwrap_err();
        assert_eq!(err.code(), "SCHEMA_INVALID");
    }

    #[test]
    fn test_reference_without_registry_is_configuration_error() {
        let schema = compile(json!({ "type": "ref", "name": "gone" })).unwrap();
        let result = schema.safe_parse(1);
        assert_eq!(result.issues().len(), 1);
        assert_eq!(result.issues()[0].code(), IssueCode::ConfigurationError);
        assert!(result.issues()[0].message.contains("gone"));
    }

    #[test]
    fn test_reference_sees_later_registration() {
        let table = Arc::new(Table::default());
        let doc: NodeDoc = serde_json::from_value(json!({ "type": "ref", "name": "id" })).unwrap();
        let schema = Compiler::new("test", Arc::downgrade(&table)).compile(&doc).unwrap();
        assert!(!schema.safe_parse(1).is_success());

        table
            .write()
            .unwrap()
            .insert("id".to_string(), schema::number().into());
        assert!(schema.safe_parse(1).is_success());
    }
}
