//! Deterministic document canonicalization and hashing.
//!
//! Structured documents are reduced to their signable fields and rendered
//! as compact JSON with object keys sorted lexicographically at every level.
//! Raw documents pass through untouched, so canonicalizing an already
//! canonical string is a no-op.

use serde_json::Value;
use sha2::{Digest, Sha256};

use docseal_contracts::document::Document;

/// Top-level fields that never contribute to a signature: internal
/// identifiers, bookkeeping timestamps, the previous signature, and history.
pub const NON_SIGNABLE_FIELDS: &[&str] = &[
    "_id",
    "__v",
    "id",
    "createdAt",
    "updatedAt",
    "created_at",
    "updated_at",
    "signature",
    "history",
];

/// Produce the canonical string form of `document`.
pub fn canonicalize(document: &Document) -> String {
    match document {
        Document::Raw(text) => text.clone(),
        Document::Structured(fields) => {
            let mut out = String::new();
            write_object(
                fields
                    .iter()
                    .filter(|(key, _)| !NON_SIGNABLE_FIELDS.contains(&key.as_str())),
                &mut out,
            );
            out
        }
    }
}

/// Lowercase hex SHA-256 of the canonical form of `document`.
pub fn document_hash(document: &Document) -> String {
    hash_bytes(canonicalize(document).as_bytes())
}

/// Lowercase hex SHA-256 of `data`.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map.iter(), out),
        Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        // Scalars: serde_json's own rendering is already deterministic.
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_object<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>, out: &mut String) {
    let mut entries: Vec<(&String, &Value)> = entries.collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (idx, (key, value)) in entries.into_iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_value(value, out);
    }
    out.push('}');
}
