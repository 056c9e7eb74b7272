//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. record_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the audit entry

use sha2::{Digest, Sha256};

use docseal_contracts::{
    error::{SignatureError, SignatureResult},
    record::AuditEntry,
};

use crate::event::AuditEvent;

/// Compute the SHA-256 hash for a single ledger event.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_event(record_id: &str, sequence: u64, entry: &AuditEntry, prev_hash: &str) -> SignatureResult<String> {
    let entry_json = serde_json::to_vec(entry).map_err(|e| SignatureError::StoreWriteFailed {
        reason: format!("audit entry could not be serialized: {e}"),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(record_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&entry_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of a hash chain.
///
/// Valid when every event's `prev_hash` equals the preceding `this_hash`
/// (or `GENESIS_HASH` for the first), every `this_hash` matches the value
/// recomputed from the event, and sequence numbers have no gaps. An empty
/// chain is valid.
pub fn verify_chain(events: &[AuditEvent]) -> bool {
    let mut expected_prev = AuditEvent::GENESIS_HASH.to_string();

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return false;
        }

        match hash_event(&event.record_id, event.sequence, &event.entry, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return false,
        }

        expected_prev = event.this_hash.clone();
    }

    true
}
