//! Metadata documents and their JSON text form in the `configs.metadata` column.
//!
//! A document is a map of string keys to a small variant tree. Keys are kept in a
//! `BTreeMap`, so the encoded text is deterministic and sorted by key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Metadata document attached to a configuration entry.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// One value inside a metadata document. Serialized untagged, so the JSON shape is the
/// natural one (`null`, `true`, `"300m"`, `{...}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<MetadataValue>),
    Object(Metadata),
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

impl From<Metadata> for MetadataValue {
    fn from(value: Metadata) -> Self {
        MetadataValue::Object(value)
    }
}

/// Column contents as handed over by the storage driver.
#[derive(Clone, Copy, Debug)]
pub enum RawMetadata<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
    /// Any other storage class; carries its name for the error message.
    Other(&'a str),
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("empty input data")]
    Empty,
    #[error("unexpected data type {0}")]
    UnexpectedType(String),
    #[error("decode metadata: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("encode metadata: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Compact JSON text for the metadata column.
pub fn encode(metadata: &Metadata) -> Result<String, CodecError> {
    serde_json::to_string(metadata).map_err(CodecError::Encode)
}

/// Parse column contents back into a document. `None` stands for SQL `NULL`.
pub fn decode(raw: Option<RawMetadata<'_>>) -> Result<Metadata, CodecError> {
    let bytes = match raw {
        None => return Err(CodecError::Empty),
        Some(RawMetadata::Bytes(bytes)) => bytes,
        Some(RawMetadata::Text(text)) => text.as_bytes(),
        Some(RawMetadata::Other(kind)) => return Err(CodecError::UnexpectedType(kind.to_string())),
    };
    if bytes.is_empty() {
        return Err(CodecError::Empty);
    }
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}
