//! Expense reference runtime demo scenarios.
//!
//! Each scenario wires up real docseal components (signing policy, record
//! store, verification engine, signature service) with mock expense data
//! and demonstrates a distinct part of the signature lifecycle.

use docseal_audit::InMemorySignatureStore;
use docseal_contracts::{
    document::{DocumentRef, UserRef},
    error::SignatureResult,
    record::SignatureRecord,
};
use docseal_core::{SignRequest, SignatureService};
use docseal_policy::TomlSigningPolicy;
use docseal_verify::VerificationEngine;

use crate::mock_data::MockDocumentProvider;

pub mod approval_signing;
pub mod revocation_and_expiry;
pub mod signer_enrollment;
pub mod tamper_detection;

// ── Policy TOML ───────────────────────────────────────────────────────────────

/// Embedded expense approval policy shared by every scenario.
pub const EXPENSE_POLICY: &str = include_str!("../../policies/expense.toml");

/// Build a service over the expense policy, keeping the caller's handles to
/// the provider and store usable afterwards.
pub fn build_service(provider: &MockDocumentProvider, store: &InMemorySignatureStore) -> SignatureResult<SignatureService> {
    let policy = TomlSigningPolicy::from_toml_str(EXPENSE_POLICY)?;
    Ok(SignatureService::new(
        Box::new(provider.clone()),
        Box::new(store.clone()),
        Box::new(VerificationEngine::new()),
        Box::new(policy),
    ))
}

/// Sign `document` as `signer` with a PEM private key and a short comment.
pub fn sign_as(
    service: &SignatureService,
    document: &str,
    signer: &str,
    private_key: &str,
    comments: &str,
) -> SignatureResult<SignatureRecord> {
    let mut request = SignRequest::new(DocumentRef::new(document), UserRef::new(signer), private_key);
    request.comments = Some(comments.to_string());
    service.sign(request)
}

/// Print the ledger integrity line every scenario ends with.
pub fn report_ledger(store: &InMemorySignatureStore) {
    let log = store.export_log();
    println!(
        "  Audit ledger integrity: {} ({} event(s), terminal hash {})",
        if store.verify_integrity() { "VERIFIED" } else { "FAILED" },
        log.events.len(),
        short_hash(&log.terminal_hash)
    );
}

/// First 12 hex characters, for display.
pub fn short_hash(hash: &str) -> &str {
    &hash[..hash.len().min(12)]
}
