//! In-memory implementation of `SignatureStore`.
//!
//! `InMemorySignatureStore` keeps records in a `Vec` behind a `Mutex` and
//! mirrors every audit entry it accepts into a store-wide SHA-256 hash
//! chain. Use `export_log()` to snapshot that ledger and
//! `verify_integrity()` to confirm it has not been tampered with.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use docseal_contracts::{
    document::{DocumentRef, RecordId, UserRef},
    error::{SignatureError, SignatureResult},
    record::{AuditEntry, SignatureRecord, SignatureStatus},
};
use docseal_core::traits::SignatureStore;

use crate::{
    chain::{hash_event, verify_chain},
    event::{AuditEvent, AuditLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct InMemoryState {
    /// All records, in creation order.
    pub(crate) records: Vec<SignatureRecord>,

    /// `(document, signer)` → position in `records`.
    pub(crate) by_pair: HashMap<(DocumentRef, UserRef), usize>,

    /// The ledger, in append order.
    pub(crate) events: Vec<AuditEvent>,

    /// The `this_hash` of the last event, or `GENESIS_HASH`.
    pub(crate) last_hash: String,
}

impl InMemoryState {
    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == *id)
    }

    /// Chain `entries` onto the ledger for `record_id`.
    ///
    /// Hashes are computed before anything is pushed, so a failure leaves
    /// the ledger untouched.
    fn append_entries(&mut self, record_id: &RecordId, entries: &[AuditEntry]) -> SignatureResult<()> {
        let record_id = record_id.to_string();
        let mut prev_hash = self.last_hash.clone();
        let mut sequence = self.events.len() as u64;
        let mut staged = Vec::with_capacity(entries.len());

        for entry in entries {
            let this_hash = hash_event(&record_id, sequence, entry, &prev_hash)?;
            staged.push(AuditEvent {
                sequence,
                record_id: record_id.clone(),
                entry: entry.clone(),
                prev_hash,
                this_hash: this_hash.clone(),
            });
            prev_hash = this_hash;
            sequence += 1;
        }

        self.events.extend(staged);
        self.last_hash = prev_hash;
        Ok(())
    }
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory signature store with optimistic versioning, append-only
/// history checks, and a hash-chained audit ledger.
///
/// Clones share the same underlying state.
#[derive(Clone)]
pub struct InMemorySignatureStore {
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemorySignatureStore {
    pub fn new() -> Self {
        let state = InMemoryState {
            records: Vec::new(),
            by_pair: HashMap::new(),
            events: Vec::new(),
            last_hash: AuditEvent::GENESIS_HASH.to_string(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> SignatureResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| SignatureError::StoreWriteFailed {
            reason: format!("store state lock poisoned: {}", e),
        })
    }

    /// Snapshot the ledger.
    pub fn export_log(&self) -> AuditLog {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        AuditLog {
            events: state.events.clone(),
            exported_at: Utc::now(),
            terminal_hash: state.events.last().map(|e| e.this_hash.clone()).unwrap_or_default(),
        }
    }

    /// Verify that the ledger has not been tampered with, and that it still
    /// mirrors every record's audit trail.
    pub fn verify_integrity(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !verify_chain(&state.events) {
            return false;
        }

        state.records.iter().all(|record| {
            let id = record.id.to_string();
            let ledger: Vec<&AuditEntry> = state
                .events
                .iter()
                .filter(|e| e.record_id == id)
                .map(|e| &e.entry)
                .collect();
            ledger.len() == record.audit_trail.len()
                && ledger.iter().zip(&record.audit_trail).all(|(a, b)| *a == b)
        })
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySignatureStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject updates that rewrite anything other than appended history,
/// status, revocation metadata, and `updated_at`.
fn check_append_only(stored: &SignatureRecord, next: &SignatureRecord) -> SignatureResult<()> {
    let violation = |reason: &str| SignatureError::AppendOnlyViolation {
        record_id: stored.id.to_string(),
        reason: reason.to_string(),
    };

    if next.document != stored.document
        || next.signer != stored.signer
        || next.envelope != stored.envelope
        || next.created_at != stored.created_at
    {
        return Err(violation("signed content and identity are immutable"));
    }
    if next.certificate != stored.certificate
        || next.timestamp_token != stored.timestamp_token
        || next.chain_of_trust != stored.chain_of_trust
        || next.signature_policy != stored.signature_policy
    {
        return Err(violation("attestations are fixed at signing time"));
    }
    if !next.verifications.starts_with(&stored.verifications) {
        return Err(violation("verifications may only be appended"));
    }
    if !next.audit_trail.starts_with(&stored.audit_trail) {
        return Err(violation("audit trail may only be appended"));
    }
    if next.audit_trail.len() == stored.audit_trail.len() {
        return Err(violation("every update must append an audit entry"));
    }
    if stored.status == SignatureStatus::Revoked
        && (next.status != SignatureStatus::Revoked || next.revocation != stored.revocation)
    {
        return Err(violation("revoked records are terminal"));
    }
    Ok(())
}

// ── SignatureStore impl ───────────────────────────────────────────────────────

impl SignatureStore for InMemorySignatureStore {
    fn create(&self, record: &SignatureRecord) -> SignatureResult<()> {
        let mut state = self.lock()?;

        let key = (record.document.clone(), record.signer.clone());
        if state.by_pair.contains_key(&key) {
            warn!(document = %record.document, signer = %record.signer, "duplicate signature rejected");
            return Err(SignatureError::DuplicateSignature {
                document: record.document.0.clone(),
                signer: record.signer.0.clone(),
            });
        }

        state.append_entries(&record.id, &record.audit_trail)?;
        let position = state.records.len();
        state.records.push(record.clone());
        state.by_pair.insert(key, position);

        info!(record_id = %record.id, document = %record.document, signer = %record.signer, "record stored");
        Ok(())
    }

    fn read(&self, id: &RecordId) -> SignatureResult<SignatureRecord> {
        let state = self.lock()?;
        state
            .position(id)
            .map(|p| state.records[p].clone())
            .ok_or_else(|| SignatureError::RecordNotFound {
                record_id: id.to_string(),
            })
    }

    fn find(&self, document: &DocumentRef, signer: &UserRef) -> SignatureResult<Option<SignatureRecord>> {
        let state = self.lock()?;
        Ok(state
            .by_pair
            .get(&(document.clone(), signer.clone()))
            .map(|&p| state.records[p].clone()))
    }

    fn list(&self) -> SignatureResult<Vec<SignatureRecord>> {
        Ok(self.lock()?.records.clone())
    }

    /// Replace the stored record after the version and append-only checks.
    ///
    /// The audit entries beyond the stored trail are chained onto the
    /// ledger, and the stored version becomes `expected_version + 1`.
    fn update(&self, mut record: SignatureRecord, expected_version: u64) -> SignatureResult<SignatureRecord> {
        let mut state = self.lock()?;

        let position = state.position(&record.id).ok_or_else(|| SignatureError::RecordNotFound {
            record_id: record.id.to_string(),
        })?;

        let stored = &state.records[position];
        if stored.version != expected_version {
            warn!(
                record_id = %record.id,
                expected = expected_version,
                actual = stored.version,
                "stale update rejected"
            );
            return Err(SignatureError::ConcurrentModification {
                record_id: record.id.to_string(),
                expected: expected_version,
                actual: stored.version,
            });
        }
        check_append_only(stored, &record)?;

        let appended = record.audit_trail[stored.audit_trail.len()..].to_vec();
        state.append_entries(&record.id, &appended)?;

        record.version = expected_version + 1;
        state.records[position] = record.clone();

        debug!(
            record_id = %record.id,
            version = record.version,
            status = %record.status,
            appended = appended.len(),
            "record updated"
        );
        Ok(record)
    }
}
