//! Generate Protocol Buffer definitions from JSON Schema documents.
//!
//! `jsonschema-proto-gen` reads a JSON Schema whose named types live under
//! the top-level `definitions` map and generates an equivalent proto3
//! definition, one `message` or `enum` per reachable named type.
//!
//! # Features
//!
//! - Translates object, enum, union (`anyOf`), array, and `$ref` nodes
//! - Collapses two-member null unions into `optional` fields; renders other
//!   unions as `oneof` blocks
//! - Discovers inline objects and enums and emits them as named types
//! - Preserves source field names via `[json_name="…"]` options whenever
//!   snake-casing would change them
//! - Deterministic output: byte-identical across runs
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let schema = jsonschema_proto_gen::schema::load_schema(Path::new("schema.json"))?;
//! let parser = jsonschema_proto_gen::codegen::SchemaParser::from_schema(schema);
//! let fragments = parser.parse("acme")?;
//! let proto = jsonschema_proto_gen::codegen::assemble(&fragments);
//! # let _ = proto;
//! # Ok::<(), jsonschema_proto_gen::error::Error>(())
//! ```

pub mod codegen;
pub mod error;
pub mod schema;
pub mod type_map;
