//! Object schemas
//!
//! Fields are kept in declaration order; that order is the order issues
//! are reported in. Every derivation returns a new schema and leaves the
//! receiver untouched.

use super::builders;
use super::choice::EnumSchema;
use super::types::{Kind, Schema};

/// Treatment of keys not named in the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Copy them to the output unvalidated
    #[default]
    Passthrough,
    /// Drop them from the output
    Strip,
    /// Report them as `unrecognized_keys`
    Strict,
}

#[derive(Clone, Default)]
pub struct ObjectSchema {
    pub(crate) shape: Vec<(String, Schema)>,
    pub(crate) unknown_keys: UnknownKeys,
    /// Validates every unknown key, overriding `unknown_keys`
    pub(crate) catchall: Option<Schema>,
}

impl ObjectSchema {
    pub fn new<I, K, S>(shape: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<Schema>,
    {
        let mut object = Self::default();
        for (key, schema) in shape {
            object.insert(key.into(), schema.into());
        }
        object
    }

    fn insert(&mut self, key: String, schema: Schema) {
        match self.shape.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = schema,
            None => self.shape.push((key, schema)),
        }
    }

    fn map_fields<F>(&self, keys: Option<&[&str]>, f: F) -> Self
    where
        F: Fn(&Schema) -> Schema,
    {
        let mut out = self.clone();
        for (key, schema) in out.shape.iter_mut() {
            if keys.map_or(true, |ks| ks.contains(&key.as_str())) {
                *schema = f(schema);
            }
        }
        out
    }

    /// Field names in declaration order.
    pub fn keys(&self) -> Vec<&str> {
        self.shape.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Schema of a declared field
    pub fn field(&self, name: &str) -> Option<&Schema> {
        self.shape.iter().find(|(k, _)| k == name).map(|(_, s)| s)
    }

    pub fn unknown_keys(&self) -> UnknownKeys {
        self.unknown_keys
    }

    /// Adds fields; a redeclared field replaces the existing one in place.
    pub fn extend<I, K, S>(&self, shape: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<Schema>,
    {
        let mut out = self.clone();
        for (key, schema) in shape {
            out.insert(key.into(), schema.into());
        }
        out
    }

    /// Extends with `other`'s fields and takes over its unknown-key policy
    /// and catchall.
    pub fn merge(&self, other: &ObjectSchema) -> Self {
        let mut out = self.extend(other.shape.iter().cloned());
        out.unknown_keys = other.unknown_keys;
        out.catchall = other.catchall.clone();
        out
    }

    pub fn pick(&self, keys: &[&str]) -> Self {
        let mut out = self.clone();
        out.shape.retain(|(k, _)| keys.contains(&k.as_str()));
        out
    }

    pub fn omit(&self, keys: &[&str]) -> Self {
        let mut out = self.clone();
        out.shape.retain(|(k, _)| !keys.contains(&k.as_str()));
        out
    }

    /// Every field accepts absence.
    pub fn partial(&self) -> Self {
        self.map_fields(None, make_optional)
    }

    /// Only the named fields accept absence.
    pub fn partial_keys(&self, keys: &[&str]) -> Self {
        self.map_fields(Some(keys), make_optional)
    }

    /// Removes `optional` wrappers from every field.
    pub fn required(&self) -> Self {
        self.map_fields(None, unwrap_optional)
    }

    pub fn required_keys(&self, keys: &[&str]) -> Self {
        self.map_fields(Some(keys), unwrap_optional)
    }

    /// Enum over the field names.
    pub fn keyof(&self) -> EnumSchema {
        EnumSchema::new(self.shape.iter().map(|(k, _)| k.clone()))
    }

    pub fn catchall(&self, schema: impl Into<Schema>) -> Self {
        let mut out = self.clone();
        out.catchall = Some(schema.into());
        out
    }

    pub fn strict(&self) -> Self {
        self.with_unknown_keys(UnknownKeys::Strict)
    }

    pub fn strip(&self) -> Self {
        self.with_unknown_keys(UnknownKeys::Strip)
    }

    pub fn passthrough(&self) -> Self {
        self.with_unknown_keys(UnknownKeys::Passthrough)
    }

    fn with_unknown_keys(&self, policy: UnknownKeys) -> Self {
        let mut out = self.clone();
        out.unknown_keys = policy;
        out
    }
}

fn make_optional(schema: &Schema) -> Schema {
    match schema.kind() {
        Kind::Optional(_) => schema.clone(),
        _ => builders::optional(schema.clone()),
    }
}

fn unwrap_optional(schema: &Schema) -> Schema {
    let mut current = schema.clone();
    loop {
        let inner = match current.kind() {
            Kind::Optional(inner) if current.node().steps.is_empty() => inner.clone(),
            _ => return current,
        };
        current = inner;
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::from_kind(Kind::Object(object))
    }
}
