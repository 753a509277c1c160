//! Error types for the jsonschema-proto-gen crate.

use std::path::PathBuf;

/// Errors that can occur while translating a JSON Schema document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not a valid JSON document conforming to the schema model.
    #[error("failed to parse JSON Schema: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read the schema file from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the generated proto file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A `$ref` points at an external schema (URL). Only intra-document
    /// references are supported.
    #[error("external schema reference '{0}' is not supported")]
    ExternalRef(String),

    /// A `$ref` uses the `$defs` container. Only `definitions` is supported.
    #[error("'$defs' container in reference '{0}' is not supported; use 'definitions'")]
    DefsRef(String),

    /// A union (`anyOf`) member carries neither a `type` nor a `$ref`,
    /// so no proto type can be derived for it.
    #[error("member of union '{union}' has neither 'type' nor '$ref'")]
    UntypedUnionMember { union: String },
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
