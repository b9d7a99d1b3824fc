//! Enumerations and discriminated unions

use std::collections::HashMap;

use super::errors::SchemaBuildError;
use super::types::{Kind, Literal, LiteralKey, Schema};
use crate::value::Value;

/// A fixed set of permitted strings.
#[derive(Debug, Clone)]
pub struct EnumSchema {
    pub(crate) values: Vec<String>,
}

impl EnumSchema {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for v in values {
            let v = v.into();
            if !unique.contains(&v) {
                unique.push(v);
            }
        }
        Self { values: unique }
    }

    pub fn options(&self) -> &[String] {
        &self.values
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Enum without the listed values.
    pub fn exclude(&self, values: &[&str]) -> Self {
        Self {
            values: self
                .values
                .iter()
                .filter(|v| !values.contains(&v.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Enum of only the listed values that are already members.
    pub fn extract(&self, values: &[&str]) -> Self {
        Self {
            values: self
                .values
                .iter()
                .filter(|v| values.contains(&v.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub(crate) fn option_values(&self) -> Vec<Value> {
        self.values.iter().map(|v| Value::from(v.as_str())).collect()
    }
}

impl From<EnumSchema> for Schema {
    fn from(e: EnumSchema) -> Self {
        Schema::from_kind(Kind::Enum(e))
    }
}

/// Named members with string or numeric values; the values are what the
/// input is matched against.
#[derive(Debug, Clone)]
pub struct NativeEnumSchema {
    pub(crate) entries: Vec<(String, Literal)>,
}

impl NativeEnumSchema {
    pub fn new<I, K, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<Literal>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, Literal)] {
        &self.entries
    }

    /// Distinct member values in declaration order.
    pub(crate) fn option_values(&self) -> Vec<Value> {
        let mut values: Vec<Value> = Vec::new();
        for (_, lit) in &self.entries {
            let v = lit.to_value();
            if !values.contains(&v) {
                values.push(v);
            }
        }
        values
    }

    pub(crate) fn accepts(&self, value: &Value) -> bool {
        self.entries.iter().any(|(_, lit)| lit.matches(value))
    }
}

impl From<NativeEnumSchema> for Schema {
    fn from(e: NativeEnumSchema) -> Self {
        Schema::from_kind(Kind::NativeEnum(e))
    }
}

/// Object variants selected by the literal value of one shared key.
#[derive(Clone)]
pub struct DiscriminatedUnionSchema {
    pub(crate) discriminator: String,
    pub(crate) variants: Vec<Schema>,
    /// Every accepted tag, in variant order
    pub(crate) tags: Vec<Literal>,
    pub(crate) lookup: HashMap<LiteralKey, usize>,
}

impl DiscriminatedUnionSchema {
    pub(crate) fn new(
        discriminator: String,
        variants: Vec<Schema>,
    ) -> Result<Self, SchemaBuildError> {
        if variants.is_empty() {
            return Err(SchemaBuildError::NoVariants { key: discriminator });
        }

        let mut tags = Vec::new();
        let mut lookup = HashMap::new();
        for (index, variant) in variants.iter().enumerate() {
            let object = match variant.kind() {
                Kind::Object(object) => object,
                _ => return Err(SchemaBuildError::NotAnObject { index }),
            };
            let variant_tags = object
                .field(&discriminator)
                .map(discriminator_values)
                .unwrap_or_default();
            if variant_tags.is_empty() {
                return Err(SchemaBuildError::MissingDiscriminator {
                    index,
                    key: discriminator,
                });
            }
            for tag in variant_tags {
                if lookup.insert(tag.key(), index).is_some() {
                    return Err(SchemaBuildError::DuplicateDiscriminator {
                        value: tag.to_value().to_string(),
                    });
                }
                tags.push(tag);
            }
        }

        Ok(Self {
            discriminator,
            variants,
            tags,
            lookup,
        })
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    pub fn variants(&self) -> &[Schema] {
        &self.variants
    }

    /// Variant selected by `tag`, if any.
    pub(crate) fn select(&self, tag: &Value) -> Option<&Schema> {
        LiteralKey::of(tag)
            .and_then(|key| self.lookup.get(&key))
            .map(|&i| &self.variants[i])
    }

    pub(crate) fn tag_values(&self) -> Vec<Value> {
        self.tags.iter().map(Literal::to_value).collect()
    }
}

impl From<DiscriminatedUnionSchema> for Schema {
    fn from(u: DiscriminatedUnionSchema) -> Self {
        Schema::from_kind(Kind::DiscriminatedUnion(u))
    }
}

/// Literal values a discriminator field can take.
fn discriminator_values(field: &Schema) -> Vec<Literal> {
    match field.kind() {
        Kind::Literal(lit) => vec![lit.clone()],
        Kind::Enum(e) => e.values.iter().map(|v| Literal::String(v.clone())).collect(),
        Kind::NativeEnum(e) => e.entries.iter().map(|(_, lit)| lit.clone()).collect(),
        Kind::Undefined => vec![Literal::Undefined],
        Kind::Null => vec![Literal::Null],
        Kind::Optional(inner) => {
            let mut tags = discriminator_values(inner);
            tags.push(Literal::Undefined);
            tags
        }
        Kind::Nullable(inner) => {
            let mut tags = discriminator_values(inner);
            tags.push(Literal::Null);
            tags
        }
        _ => Vec::new(),
    }
}
