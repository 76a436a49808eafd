//! Schema descriptors for structured (JSON-constrained) generation
//!
//! The shape mirrors Gemini's `responseSchema` subset of OpenAPI. Schemas are
//! trusted as given: nothing here checks provider output against them, and
//! keywords without a dedicated field are carried through unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Primitive type of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    #[serde(alias = "object")]
    Object,
    #[serde(alias = "array")]
    Array,
    #[serde(alias = "string")]
    String,
    #[serde(alias = "number")]
    Number,
    #[serde(alias = "boolean")]
    Boolean,
    #[serde(alias = "integer")]
    Integer,
}

/// A JSON-Schema-like descriptor used to constrain provider output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredSchema {
    /// Absent for composite schemas such as `anyOf`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, StructuredSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<StructuredSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Any other keyword (`minItems`, `anyOf`, `title`, ...), forwarded as is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StructuredSchema {
    fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            description: None,
            format: None,
            nullable: None,
            enum_values: Vec::new(),
            properties: BTreeMap::new(),
            property_ordering: Vec::new(),
            items: None,
            required: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn number() -> Self {
        Self::of(SchemaType::Number)
    }

    pub fn integer() -> Self {
        Self::of(SchemaType::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaType::Boolean)
    }

    /// An array whose elements follow `items`.
    pub fn array(items: StructuredSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    /// An object with the given properties, in declaration order.
    ///
    /// Declaration order is kept in `propertyOrdering` so the provider emits
    /// fields in a stable order.
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, StructuredSchema)>,
        K: Into<String>,
    {
        let mut schema = Self::of(SchemaType::Object);
        for (name, prop) in properties {
            let name = name.into();
            schema.property_ordering.push(name.clone());
            schema.properties.insert(name, prop);
        }
        schema
    }

    /// A string restricted to the given values.
    pub fn string_enum<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enum_values: values.into_iter().map(Into::into).collect(),
            ..Self::of(SchemaType::String)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_required<I, S>(mut self, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }
}
