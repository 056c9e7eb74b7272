//! Ledger event and log types.
//!
//! `AuditEvent` wraps one `AuditEntry` from a signature record with a
//! sequence number and the SHA-256 hashes that make tampering detectable.
//! `AuditLog` is the snapshot produced by `InMemorySignatureStore::export_log`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docseal_contracts::record::AuditEntry;

/// A single entry in the store-wide SHA-256 hash chain.
///
/// Each event commits to the previous event via `prev_hash`. Modifying any
/// field, including those of the embedded `entry`, invalidates `this_hash`
/// and every later `prev_hash`, which `verify_chain` detects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The signature record the entry belongs to.
    pub record_id: String,

    pub entry: AuditEntry,

    /// Hash of the previous event, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Computed by `hash_event()` over (record_id, sequence, prev_hash,
    /// canonical JSON of entry).
    pub this_hash: String,
}

impl AuditEvent {
    /// The `prev_hash` of the first event in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A point-in-time export of the whole ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    /// All events in chain order (sequence 0 first).
    pub events: Vec<AuditEvent>,

    pub exported_at: DateTime<Utc>,

    /// The `this_hash` of the last event. Empty if the log is empty.
    pub terminal_hash: String,
}

impl AuditLog {
    /// Events for one record, in chain order.
    pub fn for_record<'a>(&'a self, record_id: &'a str) -> impl Iterator<Item = &'a AuditEvent> + 'a {
        self.events.iter().filter(move |e| e.record_id == record_id)
    }
}
