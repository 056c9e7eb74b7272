//! Documents and identity references.
//!
//! docseal never owns documents or users. It sees a document through the
//! `Document` view a provider hands it, and a user only as an opaque
//! `UserRef` used for attribution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier of the document being signed (e.g. an expense id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentRef(pub String);

impl DocumentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a user, used only for attribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserRef(pub String);

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity used for entries written by automated sweeps.
    pub fn system() -> Self {
        Self("system".to_string())
    }
}

impl std::fmt::Display for UserRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a persisted signature record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub uuid::Uuid);

impl RecordId {
    /// Create a new, unique record ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The signable view of a document.
///
/// Callers either hand over raw text, which is signed as-is, or a field
/// mapping, which is canonicalized before hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Document {
    Raw(String),
    Structured(Map<String, Value>),
}

impl Document {
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    /// Build a structured document from a JSON value.
    ///
    /// Non-object values have no fields to sort, so they are kept as raw
    /// text using their compact JSON rendering.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::Structured(fields),
            Value::String(text) => Self::Raw(text),
            other => Self::Raw(other.to_string()),
        }
    }

    /// Mutable access to a structured field, `None` for raw documents.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Self::Structured(fields) => fields.get_mut(name),
            Self::Raw(_) => None,
        }
    }
}
