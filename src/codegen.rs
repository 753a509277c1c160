//! Proto3 code generation from a JSON Schema document.
//!
//! Generates one `message` or `enum` per reachable named type:
//! - Named `definitions` become top-level messages (or enums when they
//!   carry `enum` values)
//! - Referenced definitions, inline objects, and inline enums discovered
//!   during emission are queued and emitted in later passes
//! - A dedup set keyed by Pascal-cased type name prevents double-definition
//!
//! The generated output is deterministic: identical input always produces
//! byte-identical output. Definition and property keys are ordered by
//! ascending name length (ties keep document order), and field numbers are
//! assigned sequentially from 1 in emission order.

use std::collections::HashSet;
use std::fmt::Write;

use indexmap::IndexMap;
use log::debug;

use crate::error::{Error, Result};
use crate::schema::{ref_type_name, resolve_ref, Property, PropertyKind, Schema, SchemaType};
use crate::type_map::{json_type_to_proto, sanitize, to_camel_case, to_pascal_case, to_snake_case};

/// Statistics collected during translation for reporting.
#[derive(Debug, Default)]
pub struct TranslationStats {
    pub messages_emitted: usize,
    pub enums_emitted: usize,
    pub complex_arrays_skipped: usize,
    pub duplicates_suppressed: usize,
}

/// A parsed schema document ready for translation.
pub struct SchemaParser {
    schema: Schema,
}

impl SchemaParser {
    /// Decode raw schema bytes. Fails if the bytes are not a valid JSON
    /// document conforming to the schema model.
    pub fn new(schema_bytes: &[u8]) -> Result<Self> {
        let schema: Schema = serde_json::from_slice(schema_bytes)?;
        Ok(Self { schema })
    }

    /// Wrap an already-decoded schema.
    pub fn from_schema(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Translate the schema into an ordered sequence of proto3 text
    /// fragments: a header parameterized by `package_name`, the root
    /// definitions, then every deferred type discovered along the way.
    ///
    /// Concatenate the fragments with [`assemble`] to obtain the final
    /// `.proto` text.
    pub fn parse(&self, package_name: &str) -> Result<Vec<String>> {
        self.parse_with_stats(package_name)
            .map(|(fragments, _)| fragments)
    }

    /// Like [`SchemaParser::parse`], also returning translation statistics.
    pub fn parse_with_stats(&self, package_name: &str) -> Result<(Vec<String>, TranslationStats)> {
        Emitter::new(&self.schema.definitions).translate(package_name)
    }
}

// ── Deferred work queue ────────────────────────────────────────────────

/// A type discovered during emission and deferred to a later pass. The
/// queue key is the (not yet Pascal-cased) name the type will be emitted
/// under.
enum QueueItem<'a> {
    /// A properties map resolved from a `$ref`.
    MessageProps(&'a IndexMap<String, Property>),
    /// A whole inline object node.
    MessageNode(&'a Property),
    /// An inline enum's value list.
    EnumValues(&'a [String]),
}

// ── Emitter ────────────────────────────────────────────────────────────

struct Emitter<'a> {
    root: &'a IndexMap<String, Property>,
    queue: IndexMap<String, QueueItem<'a>>,
    emitted: HashSet<String>,
    stats: TranslationStats,
}

impl<'a> Emitter<'a> {
    fn new(root: &'a IndexMap<String, Property>) -> Self {
        Self {
            root,
            queue: IndexMap::new(),
            emitted: HashSet::new(),
            stats: TranslationStats::default(),
        }
    }

    fn translate(mut self, package_name: &str) -> Result<(Vec<String>, TranslationStats)> {
        let mut fragments = vec![header(package_name)];
        fragments.push(self.root_definitions()?);

        // Drain the queue in passes: emitting a pass's items may discover
        // further types, which land in the next pass.
        while !self.queue.is_empty() {
            let batch = std::mem::take(&mut self.queue);
            for (name, item) in batch {
                let fragment = match item {
                    QueueItem::MessageProps(properties) => self.message(&name, properties)?,
                    QueueItem::MessageNode(node) => self.message(&name, &node.properties)?,
                    QueueItem::EnumValues(values) => self.enumeration(&name, values),
                };
                fragments.push(fragment);
            }
        }

        Ok((fragments, self.stats))
    }

    /// Emit every root definition, shortest name first.
    fn root_definitions(&mut self) -> Result<String> {
        let root = self.root;
        let mut definitions: Vec<(&'a String, &'a Property)> = root.iter().collect();
        definitions.sort_by_key(|(name, _)| name.len());

        let mut out = String::new();
        for (name, definition) in definitions {
            let fragment = match definition.kind() {
                PropertyKind::Enum(values) => self.enumeration(name, values),
                _ => self.message(name, &definition.properties)?,
            };
            out.push_str(&fragment);
            out.push('\n');
        }
        Ok(out)
    }

    /// Render a `message` block, or an empty fragment if the Pascal-cased
    /// name was already emitted.
    fn message(&mut self, name: &str, properties: &'a IndexMap<String, Property>) -> Result<String> {
        let type_name = to_pascal_case(name);
        if !self.emitted.insert(type_name.clone()) {
            debug!("suppressing duplicate definition '{type_name}'");
            self.stats.duplicates_suppressed += 1;
            return Ok(String::new());
        }

        let mut fields: Vec<(&'a String, &'a Property)> = properties.iter().collect();
        fields.sort_by_key(|(field_name, _)| field_name.len());

        let mut body = String::new();
        let mut number = 1u32;
        for (field_name, property) in fields {
            if let Some(line) = self.field(field_name, property, &mut number)? {
                body.push_str(&line);
                body.push('\n');
            }
        }

        self.stats.messages_emitted += 1;
        Ok(format!("\nmessage {type_name} {{\n{body}}}\n"))
    }

    /// Render an `enum` block, or an empty fragment on a duplicate name.
    /// Members are numbered from 0 in value order.
    fn enumeration(&mut self, name: &str, values: &[String]) -> String {
        let type_name = to_pascal_case(name);
        if !self.emitted.insert(type_name.clone()) {
            debug!("suppressing duplicate definition '{type_name}'");
            self.stats.duplicates_suppressed += 1;
            return String::new();
        }

        let mut body = String::new();
        for (index, value) in values.iter().enumerate() {
            let member = format!("{type_name}_{}", sanitize(value)).to_uppercase();
            writeln!(body, "\t{member} = {index};").unwrap();
        }

        self.stats.enums_emitted += 1;
        format!("\nenum {type_name} {{\n{body}}}\n")
    }

    /// Render one field line (or a small block for unions). Returns `None`
    /// for array-of-objects properties, which are not translated; those
    /// consume no field number.
    fn field(
        &mut self,
        name: &str,
        property: &'a Property,
        number: &mut u32,
    ) -> Result<Option<String>> {
        match property.kind() {
            PropertyKind::Primitive => Ok(Some(primitive_field(
                name,
                property.type_name.as_ref(),
                number,
            ))),
            PropertyKind::Ref(reference) => {
                let (target, properties) = resolve_ref(reference, self.root)?;
                self.enqueue(name, QueueItem::MessageProps(properties));
                Ok(Some(ref_field(name, target, number)))
            }
            PropertyKind::PrimitiveArray(item_type) => {
                Ok(Some(primitive_array_field(name, item_type, number)))
            }
            PropertyKind::UnknownArray => {
                Ok(Some(ref_array_field(name, "google.protobuf.Any", number)))
            }
            PropertyKind::RefArray(reference) => {
                let (target, properties) = resolve_ref(reference, self.root)?;
                self.enqueue(name, QueueItem::MessageProps(properties));
                Ok(Some(ref_array_field(name, target, number)))
            }
            PropertyKind::ComplexArray => {
                debug!("skipping array-of-objects property '{name}'");
                self.stats.complex_arrays_skipped += 1;
                Ok(None)
            }
            PropertyKind::Enum(values) => {
                self.enqueue(name, QueueItem::EnumValues(values));
                Ok(Some(ref_field(name, name, number)))
            }
            PropertyKind::NestedObject => {
                self.enqueue(name, QueueItem::MessageNode(property));
                Ok(Some(ref_field(name, name, number)))
            }
            PropertyKind::Union(members) => self.union_field(name, members, number).map(Some),
        }
    }

    /// Render an `anyOf` union.
    ///
    /// A two-member union with one `null` member collapses to a single
    /// `optional` field typed after the non-null member. Every other union
    /// becomes a `oneof <name>_union` block. Member fields are named
    /// `<camelUnionName>_<camelTypeName>` after the member's `type`, or the
    /// referenced definition's name when `type` is absent.
    fn union_field(
        &mut self,
        name: &str,
        members: &'a [Property],
        number: &mut u32,
    ) -> Result<String> {
        if members.len() == 2 {
            let mut nullable = false;
            let mut inner: Option<&'a Property> = None;
            for member in members {
                if member.type_name == Some(SchemaType::Null) {
                    nullable = true;
                } else {
                    inner = Some(member);
                }
            }
            if nullable {
                let inner = inner.ok_or_else(|| Error::UntypedUnionMember {
                    union: name.to_string(),
                })?;
                let label = member_type_label(inner, name)?;
                let member_name = format!("{}_{}", to_camel_case(name), to_camel_case(&label));
                let line = self.field(&member_name, inner, number)?.unwrap_or_default();
                return Ok(format!("\toptional {}", line.trim_start_matches('\t')));
            }
        }

        let mut body = String::new();
        for member in members {
            let label = member_type_label(member, name)?;
            let member_name = format!("{}_{}", to_camel_case(name), to_camel_case(&label));
            if let Some(line) = self.field(&member_name, member, number)? {
                body.push('\t');
                body.push_str(&line);
                body.push('\n');
            }
        }
        Ok(format!("\toneof {}_union {{\n{body}\t}}", to_camel_case(name)))
    }

    fn enqueue(&mut self, name: &str, item: QueueItem<'a>) {
        debug!("queued deferred type '{name}'");
        self.queue.insert(name.to_string(), item);
    }
}

/// The proto type a union member contributes to its field name: the
/// member's `type` keyword, or the referenced definition's name when
/// `type` is absent or empty. Neither being usable is fatal.
fn member_type_label(member: &Property, union_name: &str) -> Result<String> {
    let label = match &member.type_name {
        Some(type_name) if !type_name.as_str().is_empty() => type_name.as_str().to_string(),
        _ => ref_type_name(member).to_string(),
    };
    if label.is_empty() {
        return Err(Error::UntypedUnionMember {
            union: union_name.to_string(),
        });
    }
    Ok(label)
}

// ── Field rendering ────────────────────────────────────────────────────

/// Render `\t<type> <camelName> = <n>;`, appending `[json_name="…"]` when
/// snake-casing the source name changes it. Increments the field counter.
fn render_field(proto_type: &str, name: &str, number: &mut u32) -> String {
    let (snake_name, changed) = to_snake_case(name);
    let line = if changed {
        format!(
            "\t{proto_type} {} = {number} [json_name=\"{snake_name}\"];",
            to_camel_case(name)
        )
    } else {
        format!("\t{proto_type} {} = {number};", to_camel_case(name))
    };
    *number += 1;
    line
}

fn primitive_field(name: &str, type_name: Option<&SchemaType>, number: &mut u32) -> String {
    render_field(&json_type_to_proto(type_name), name, number)
}

fn primitive_array_field(name: &str, item_type: &SchemaType, number: &mut u32) -> String {
    let inner = primitive_field(name, Some(item_type), number);
    format!("\trepeated {}", inner.strip_prefix('\t').unwrap_or(&inner))
}

fn ref_field(name: &str, type_name: &str, number: &mut u32) -> String {
    render_field(&to_pascal_case(type_name), name, number)
}

fn ref_array_field(name: &str, type_name: &str, number: &mut u32) -> String {
    let inner = ref_field(name, type_name, number);
    format!("\trepeated {}", inner.strip_prefix('\t').unwrap_or(&inner))
}

// ── Output assembly ────────────────────────────────────────────────────

/// The fixed file header. The `google/protobuf/any.proto` import is always
/// present, used or not.
fn header(package_name: &str) -> String {
    format!(
        "syntax = \"proto3\";\n\npackage {package_name};\n\nimport \"google/protobuf/any.proto\";\n"
    )
}

/// Concatenate fragments into the final output: empty lines are dropped
/// and every remaining line is terminated with CRLF.
pub fn assemble(fragments: &[String]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        for line in fragment.lines() {
            if !line.is_empty() {
                out.push_str(line);
                out.push_str("\r\n");
            }
        }
    }
    out
}
