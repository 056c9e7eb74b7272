//! Simulated expense data for the docseal reference runtime.
//!
//! All data in this module is hardcoded and fictional. `MockDocumentProvider`
//! stands in for the expense database a real deployment would read signable
//! documents from.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use docseal_contracts::{
    document::{Document, DocumentRef},
    error::{SignatureError, SignatureResult},
};
use docseal_core::traits::DocumentProvider;

// ── Expense reports (mock) ────────────────────────────────────────────────────

/// The canonical flight expense: `{title: "Flight", amount: 120.50}` plus
/// the storage fields a database row would carry.
pub fn flight_expense() -> Value {
    json!({
        "_id": "65f0c0ffee0000000000a001",
        "__v": 0,
        "title": "Flight",
        "amount": 120.50,
        "createdAt": "2026-03-02T09:15:00Z",
        "updatedAt": "2026-03-02T09:15:00Z"
    })
}

/// A multi-line hotel expense with nested line items.
pub fn hotel_expense() -> Value {
    json!({
        "_id": "65f0c0ffee0000000000a002",
        "title": "Hotel - Lisbon offsite",
        "amount": 642.00,
        "currency": "EUR",
        "submittedBy": "dana.okafor",
        "lineItems": [
            { "description": "Room, 3 nights", "amount": 540.00 },
            { "description": "City tax", "amount": 12.00 },
            { "description": "Breakfast", "amount": 90.00 }
        ],
        "createdAt": "2026-03-04T17:40:00Z",
        "updatedAt": "2026-03-05T08:02:00Z"
    })
}

/// A conference registration fee.
pub fn conference_expense() -> Value {
    json!({
        "_id": "65f0c0ffee0000000000a003",
        "title": "RustConf registration",
        "amount": 450.00,
        "currency": "USD",
        "submittedBy": "li.wen",
        "costCenter": "ENG-platform"
    })
}

// ── Document provider ─────────────────────────────────────────────────────────

/// An in-memory expense database.
///
/// Clones share the same rows, so a scenario can keep a handle after giving
/// one to the signature service and then amend documents underneath it.
#[derive(Clone, Default)]
pub struct MockDocumentProvider {
    rows: Arc<Mutex<HashMap<String, Value>>>,
}

impl MockDocumentProvider {
    /// A provider pre-loaded with the three fictional expense reports.
    pub fn seeded() -> Self {
        let provider = Self::default();
        provider.insert("expense-1001", flight_expense());
        provider.insert("expense-1002", hotel_expense());
        provider.insert("expense-1003", conference_expense());
        provider
    }

    pub fn insert(&self, id: &str, row: Value) {
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), row);
    }

    /// Overwrite one top-level field of a stored row. Returns false if the
    /// row does not exist.
    pub fn amend(&self, id: &str, field: &str, value: Value) -> bool {
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        match rows.get_mut(id).and_then(Value::as_object_mut) {
            Some(row) => {
                row.insert(field.to_string(), value);
                true
            }
            None => false,
        }
    }
}

impl DocumentProvider for MockDocumentProvider {
    fn fetch(&self, document: &DocumentRef) -> SignatureResult<Document> {
        let rows = self.rows.lock().map_err(|e| SignatureError::StoreWriteFailed {
            reason: format!("document table lock poisoned: {}", e),
        })?;
        rows.get(&document.0)
            .cloned()
            .map(Document::from_json)
            .ok_or_else(|| SignatureError::DocumentNotFound {
                document: document.0.clone(),
            })
    }
}
