//! Declarative schema documents
//!
//! One file holds one named schema:
//!
//! ```json
//! {
//!   "name": "user",
//!   "description": "Account holder",
//!   "schema": {
//!     "type": "object",
//!     "properties": {
//!       "email": { "type": "string", "format": "email" },
//!       "age": { "type": "optional", "inner": { "type": "number", "int": true, "min": 0 } },
//!       "friends": { "type": "array", "items": { "type": "ref", "name": "user" } }
//!     },
//!     "unknown_keys": "strict"
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: NodeDoc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKeysDoc {
    #[default]
    Passthrough,
    Strip,
    Strict,
}

/// The declarative subset of schema nodes. Closures (refinements,
/// transforms, preprocessors) have no document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeDoc {
    String {
        #[serde(default)]
        coerce: bool,
        #[serde(default)]
        trim: bool,
        #[serde(default)]
        lowercase: bool,
        #[serde(default)]
        uppercase: bool,
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
        #[serde(default)]
        length: Option<usize>,
        /// `email`, `url`, `uuid`, `datetime`, `ipv4`, ...
        #[serde(default)]
        format: Option<String>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        includes: Option<String>,
        #[serde(default)]
        starts_with: Option<String>,
        #[serde(default)]
        ends_with: Option<String>,
        /// Message of the last check
        #[serde(default)]
        message: Option<String>,
    },
    Number {
        #[serde(default)]
        coerce: bool,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default)]
        gt: Option<f64>,
        #[serde(default)]
        lt: Option<f64>,
        #[serde(default)]
        int: bool,
        #[serde(default)]
        multiple_of: Option<f64>,
        #[serde(default)]
        finite: bool,
        #[serde(default)]
        message: Option<String>,
    },
    Bigint {
        #[serde(default)]
        coerce: bool,
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
        #[serde(default)]
        multiple_of: Option<i64>,
    },
    Boolean {
        #[serde(default)]
        coerce: bool,
    },
    Date {
        #[serde(default)]
        coerce: bool,
        /// RFC 3339 instant
        #[serde(default)]
        min: Option<String>,
        #[serde(default)]
        max: Option<String>,
    },
    Null,
    Undefined,
    Any,
    Unknown,
    Never,
    Literal {
        value: serde_json::Value,
    },
    Enum {
        values: Vec<String>,
    },
    Object {
        #[serde(default)]
        properties: BTreeMap<String, NodeDoc>,
        #[serde(default)]
        unknown_keys: UnknownKeysDoc,
        #[serde(default)]
        catchall: Option<Box<NodeDoc>>,
    },
    Array {
        items: Box<NodeDoc>,
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
        #[serde(default)]
        length: Option<usize>,
        #[serde(default)]
        nonempty: bool,
    },
    Tuple {
        items: Vec<NodeDoc>,
        #[serde(default)]
        rest: Option<Box<NodeDoc>>,
    },
    Set {
        items: Box<NodeDoc>,
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
    Record {
        /// Key schema; any string when absent
        #[serde(default)]
        key: Option<Box<NodeDoc>>,
        value: Box<NodeDoc>,
    },
    Map {
        key: Box<NodeDoc>,
        value: Box<NodeDoc>,
    },
    Union {
        variants: Vec<NodeDoc>,
    },
    DiscriminatedUnion {
        discriminator: String,
        variants: Vec<NodeDoc>,
    },
    Intersection {
        left: Box<NodeDoc>,
        right: Box<NodeDoc>,
    },
    Optional {
        inner: Box<NodeDoc>,
    },
    Nullable {
        inner: Box<NodeDoc>,
    },
    Default {
        inner: Box<NodeDoc>,
        value: serde_json::Value,
    },
    /// Another document, by name
    Ref {
        name: String,
    },
}

impl NodeDoc {
    /// Names of every document this node references.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            NodeDoc::Ref { name } => out.push(name),
            NodeDoc::Object {
                properties,
                catchall,
                ..
            } => {
                for node in properties.values() {
                    node.collect_references(out);
                }
                if let Some(node) = catchall {
                    node.collect_references(out);
                }
            }
            NodeDoc::Array { items, .. } | NodeDoc::Set { items, .. } => {
                items.collect_references(out)
            }
            NodeDoc::Tuple { items, rest } => {
                for node in items {
                    node.collect_references(out);
                }
                if let Some(node) = rest {
                    node.collect_references(out);
                }
            }
            NodeDoc::Record { key, value } => {
                if let Some(node) = key {
                    node.collect_references(out);
                }
                value.collect_references(out);
            }
            NodeDoc::Map { key, value } => {
                key.collect_references(out);
                value.collect_references(out);
            }
            NodeDoc::Union { variants } | NodeDoc::DiscriminatedUnion { variants, .. } => {
                for node in variants {
                    node.collect_references(out);
                }
            }
            NodeDoc::Intersection { left, right } => {
                left.collect_references(out);
                right.collect_references(out);
            }
            NodeDoc::Optional { inner }
            | NodeDoc::Nullable { inner }
            | NodeDoc::Default { inner, .. } => inner.collect_references(out),
            _ => {}
        }
    }
}
