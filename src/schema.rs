//! JSON Schema model, loading, classification, and reference resolution.
//!
//! The model covers the `definitions`-driven subset of JSON Schema that the
//! generator translates: named definitions holding object, enum, union,
//! array, and reference nodes. Validation keywords (`minimum`, `pattern`,
//! `format`, ...) are decoded and carried but do not influence generation.
//!
//! Absence is significant everywhere: an absent `type` classifies
//! differently from any present one, and an absent `$ref` differently from
//! an empty string, so every optional keyword is an `Option`.

use std::path::Path;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};

/// A decoded JSON Schema document.
///
/// Only `definitions` drives generation; the meta fields and the top-level
/// `required` list are carried for completeness.
#[derive(Debug, Deserialize)]
pub struct Schema {
    /// Meta-schema URI (e.g., `"http://json-schema.org/draft-07/schema#"`).
    #[serde(rename = "$schema")]
    pub meta_schema: Option<String>,

    /// Schema identifier URI.
    #[serde(rename = "$id")]
    pub id: Option<String>,

    pub title: Option<String>,

    pub description: Option<String>,

    /// Named definitions keyed by name, in document order. Each becomes a
    /// proto `message` or `enum`.
    #[serde(default)]
    pub definitions: IndexMap<String, Property>,

    /// Required top-level names.
    #[serde(default)]
    pub required: Vec<String>,
}

/// A recursive schema node: a definition, a property, or an array item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    pub description: Option<String>,

    /// The `type` keyword. Absent is distinct from every concrete type.
    #[serde(rename = "type")]
    pub type_name: Option<SchemaType>,

    /// Enum string literals, in document order. Presence makes the node an
    /// enumeration regardless of `type`.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,

    /// Child properties, in document order. Meaningful when `type` is
    /// `object`.
    pub properties: IndexMap<String, Property>,

    /// Array item node. Meaningful when `type` is `array`.
    pub items: Option<Box<Property>>,

    /// Intra-document JSON pointer (e.g., `"#/definitions/Foo"`).
    #[serde(rename = "$ref")]
    pub reference: Option<String>,

    /// Disjoint union members, in document order.
    pub any_of: Option<Vec<Property>>,

    // Carried validation keywords; inert during generation.
    pub one_of: Option<Vec<Property>>,
    pub all_of: Option<Vec<Property>>,
    pub required: Vec<String>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub exclusive_minimum: Option<i64>,
    pub min_items: Option<i64>,
    pub unique_items: Option<bool>,
    pub pattern: Option<String>,
    pub format: Option<String>,
}

/// The `type` keyword. Unrecognized strings are kept verbatim in `Other`
/// and pass through to the output unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Object,
    Array,
    Boolean,
    Null,
    Other(String),
}

impl From<String> for SchemaType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "string" => SchemaType::String,
            "number" => SchemaType::Number,
            "integer" => SchemaType::Integer,
            "object" => SchemaType::Object,
            "array" => SchemaType::Array,
            "boolean" => SchemaType::Boolean,
            "null" => SchemaType::Null,
            _ => SchemaType::Other(s),
        }
    }
}

impl SchemaType {
    /// The keyword spelling of this type, as written in the document.
    pub fn as_str(&self) -> &str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
            SchemaType::Other(s) => s,
        }
    }
}

/// The nine-way classification that drives field emission.
///
/// Each arm carries the data its emitter needs; the borrow ties back to the
/// classified [`Property`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind<'a> {
    /// `enum` present; carries the value list.
    Enum(&'a [String]),
    /// `anyOf` present; carries the members.
    Union(&'a [Property]),
    /// Array whose items carry neither `type` nor `$ref` (or no `items`).
    UnknownArray,
    /// Array of references; carries the items' `$ref` string.
    RefArray(&'a str),
    /// Array of inline objects. Not translated.
    ComplexArray,
    /// Array of scalars; carries the items' `type`.
    PrimitiveArray(&'a SchemaType),
    /// Inline object.
    NestedObject,
    /// Reference; carries the `$ref` string.
    Ref(&'a str),
    /// Everything else: a scalar (or typeless) leaf.
    Primitive,
}

impl Property {
    /// Classify this node. First match wins: `enum` short-circuits even
    /// when `type` is set, then `anyOf`, then the array shapes, then
    /// `object`, then `$ref`. Total; `Primitive` is the catch-all.
    pub fn kind(&self) -> PropertyKind<'_> {
        if let Some(values) = &self.enum_values {
            return PropertyKind::Enum(values);
        }
        if let Some(members) = &self.any_of {
            return PropertyKind::Union(members);
        }
        if self.type_name == Some(SchemaType::Array) {
            return match self.items.as_deref() {
                None => PropertyKind::UnknownArray,
                Some(items) => match (&items.type_name, &items.reference) {
                    (None, None) => PropertyKind::UnknownArray,
                    (_, Some(reference)) => PropertyKind::RefArray(reference),
                    (Some(SchemaType::Object), None) => PropertyKind::ComplexArray,
                    (Some(item_type), None) => PropertyKind::PrimitiveArray(item_type),
                },
            };
        }
        if self.type_name == Some(SchemaType::Object) {
            return PropertyKind::NestedObject;
        }
        if let Some(reference) = &self.reference {
            return PropertyKind::Ref(reference);
        }
        PropertyKind::Primitive
    }
}

/// The final path segment of a node's `$ref`, or `""` when `$ref` is absent.
///
/// This is the referenced definition's name (`"#/definitions/Foo"` → `"Foo"`).
pub fn ref_type_name(property: &Property) -> &str {
    property
        .reference
        .as_deref()
        .and_then(|r| r.rsplit('/').next())
        .unwrap_or("")
}

/// Walk a `$ref` JSON pointer within the document.
///
/// Returns the final path segment (the referenced type's name) and the
/// `properties` map it resolves to. The leading `#` segment is ignored and
/// a `definitions` container segment is skipped; each further segment
/// descends through that node's `properties`. A segment that does not exist
/// resolves to an empty map, so a dangling reference yields an empty
/// message rather than a failure.
///
/// Fatal: references starting with `http` (external schemas) and references
/// into `$defs`.
pub fn resolve_ref<'s, 'r>(
    reference: &'r str,
    root: &'s IndexMap<String, Property>,
) -> Result<(&'r str, &'s IndexMap<String, Property>)> {
    if reference.to_lowercase().starts_with("http") {
        return Err(Error::ExternalRef(reference.to_string()));
    }

    let segments: Vec<&str> = reference.split('/').collect();
    let mut current = root;
    for (index, segment) in segments.iter().enumerate().skip(1) {
        if index == 1 {
            if *segment == "$defs" {
                return Err(Error::DefsRef(reference.to_string()));
            }
            if *segment == "definitions" {
                continue;
            }
        }
        current = match current.get(*segment) {
            Some(property) => &property.properties,
            None => empty_properties(),
        };
    }
    Ok((segments.last().copied().unwrap_or(""), current))
}

fn empty_properties() -> &'static IndexMap<String, Property> {
    static EMPTY: OnceLock<IndexMap<String, Property>> = OnceLock::new();
    EMPTY.get_or_init(IndexMap::new)
}

/// Load a schema document from disk.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let schema: Schema = serde_json::from_str(&content)?;
    Ok(schema)
}
