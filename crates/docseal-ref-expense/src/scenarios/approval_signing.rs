//! Scenario 1: Expense Approval Signing
//!
//! A manager and a finance controller both approve the same flight expense.
//! The policy verifies on sign, attaches a timestamp token and a one-year
//! certificate, and asserts the finance chain of trust.
//!
//! Pipeline walk-through for the demo run:
//!   1. Manager signs expense-1001 → record created, verified → `valid`
//!   2. Finance controller signs the same expense → second, independent record
//!   3. Manager signs again → rejected as a duplicate (one record per pair)
//!   4. A service account tries to sign → denied by policy, key never used
//!   5. The manager asks for SHA512withRSA → denied by policy
//!   6. Audit ledger integrity verified at the end

use serde_json::json;

use docseal_audit::InMemorySignatureStore;
use docseal_contracts::{
    document::{DocumentRef, UserRef},
    envelope::Algorithm,
    error::{SignatureError, SignatureResult},
};
use docseal_core::SignRequest;
use docseal_crypto::keys::generate_key_pair;

use crate::mock_data::MockDocumentProvider;
use crate::scenarios::{build_service, report_ledger, short_hash, sign_as};

/// Run Scenario 1: Expense Approval Signing.
pub fn run_scenario() -> SignatureResult<()> {
    println!("=== Scenario 1: Expense Approval Signing ===");
    println!();

    let provider = MockDocumentProvider::seeded();
    let store = InMemorySignatureStore::new();
    let service = build_service(&provider, &store)?;

    let manager_key = generate_key_pair()?;
    let finance_key = generate_key_pair()?;

    // ── Step 1: Manager approval ──────────────────────────────────────────────

    let mut request = SignRequest::new(
        DocumentRef::new("expense-1001"),
        UserRef::new("maria.santos"),
        manager_key.private_key.clone(),
    );
    request.metadata.insert("purpose".to_string(), json!("expense-approval"));
    request.metadata.insert("approvalLevel".to_string(), json!("manager"));
    request.comments = Some("approved against Q1 travel budget".to_string());

    let manager_record = service.sign(request)?;

    println!("  Signer:                 maria.santos (manager)");
    println!("  Document:               expense-1001 (Flight, 120.50)");
    println!("  Document hash:          {}", manager_record.envelope.document_hash);
    println!("  Algorithm:              {}", manager_record.envelope.algorithm);
    println!("  Signature size:         {} bytes", manager_record.envelope.metadata.signature_size);
    if let Some(token) = &manager_record.timestamp_token {
        println!("  Timestamp authority:    {}", token.authority_id);
    }
    if let Some(cert) = &manager_record.certificate {
        println!("  Certificate:            {} (valid to {})", cert.serial_number, cert.valid_to.date_naive());
    }
    println!(
        "  Chain of trust:         {}",
        manager_record
            .chain_of_trust
            .iter()
            .map(|c| c.authority.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    );
    println!("  Status after sign:      {}", manager_record.status);
    println!();

    // ── Step 2: Finance approval ──────────────────────────────────────────────

    let finance_record = sign_as(
        &service,
        "expense-1001",
        "omar.haddad",
        &finance_key.private_key,
        "within per-diem policy",
    )?;
    println!("  Signer:                 omar.haddad (finance)");
    println!("  Status after sign:      {}", finance_record.status);
    println!(
        "  Same document hash:     {}",
        finance_record.envelope.document_hash == manager_record.envelope.document_hash
    );
    println!();

    // ── Step 3: Duplicate approval ────────────────────────────────────────────

    match sign_as(&service, "expense-1001", "maria.santos", &manager_key.private_key, "again") {
        Err(SignatureError::DuplicateSignature { .. }) => {
            println!("  Duplicate signature:    REJECTED (expected)");
        }
        Ok(_) => println!("  Duplicate signature:    unexpectedly accepted"),
        Err(e) => return Err(e),
    }

    // ── Step 4: Service account ───────────────────────────────────────────────

    match sign_as(&service, "expense-1002", "svc-batch-approver", &finance_key.private_key, "auto") {
        Err(SignatureError::PolicyDenied { reason }) => {
            println!("  Service account:        DENIED ({})", reason);
        }
        Ok(_) => println!("  Service account:        unexpectedly allowed"),
        Err(e) => return Err(e),
    }

    // ── Step 5: Disallowed algorithm ──────────────────────────────────────────

    let mut sha512 = SignRequest::new(
        DocumentRef::new("expense-1002"),
        UserRef::new("maria.santos"),
        manager_key.private_key.clone(),
    );
    sha512.algorithm = Some(Algorithm::Sha512WithRsa);
    match service.sign(sha512) {
        Err(SignatureError::PolicyDenied { reason }) => {
            println!("  SHA512withRSA request:  DENIED ({})", reason);
        }
        Ok(_) => println!("  SHA512withRSA request:  unexpectedly allowed"),
        Err(e) => return Err(e),
    }
    println!();

    // ── Step 6: Ledger ────────────────────────────────────────────────────────

    println!(
        "  Records stored:         {} (manager {}, finance {})",
        store.len(),
        short_hash(&manager_record.id.to_string()),
        short_hash(&finance_record.id.to_string())
    );
    report_ledger(&store);
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use docseal_contracts::record::{AuditAction, SignatureStatus, VerificationMethod};
    use docseal_core::traits::SignatureStore;

    use super::*;

    #[test]
    fn test_scenario_runs() {
        assert!(run_scenario().is_ok());
    }

    /// The expense policy verifies on sign, so new records come back valid
    /// with a signed and a verified audit entry.
    #[test]
    fn test_sign_verifies_immediately() {
        let provider = MockDocumentProvider::seeded();
        let store = InMemorySignatureStore::new();
        let service = build_service(&provider, &store).unwrap();
        let key = generate_key_pair().unwrap();

        let record = sign_as(&service, "expense-1001", "maria.santos", &key.private_key, "ok").unwrap();

        assert_eq!(record.status, SignatureStatus::Valid);
        assert_eq!(record.version, 1);
        assert_eq!(record.signature_policy.policy_id, "expense-approval");
        assert_eq!(record.verifications.len(), 1);
        assert_eq!(record.verifications[0].method, VerificationMethod::Automatic);
        let actions: Vec<AuditAction> = record.audit_trail.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![AuditAction::Signed, AuditAction::Verified]);
        assert_eq!(record.audit_trail[0].comments.as_deref(), Some("ok"));
        assert_eq!(store.read(&record.id).unwrap(), record);
    }

    #[test]
    fn test_denied_request_creates_nothing() {
        let provider = MockDocumentProvider::seeded();
        let store = InMemorySignatureStore::new();
        let service = build_service(&provider, &store).unwrap();
        let key = generate_key_pair().unwrap();

        let result = sign_as(&service, "expense-1001", "svc-nightly", &key.private_key, "auto");

        assert!(matches!(result, Err(SignatureError::PolicyDenied { .. })));
        assert!(store.is_empty());
        assert!(store.export_log().events.is_empty());
    }

    #[test]
    fn test_unknown_document_denied_by_default() {
        let provider = MockDocumentProvider::seeded();
        provider.insert("contract-7", serde_json::json!({ "title": "Lease" }));
        let store = InMemorySignatureStore::new();
        let service = build_service(&provider, &store).unwrap();
        let key = generate_key_pair().unwrap();

        match sign_as(&service, "contract-7", "maria.santos", &key.private_key, "n/a") {
            Err(SignatureError::PolicyDenied { reason }) => {
                assert!(reason.contains("denied by default"), "unexpected reason: {reason}");
            }
            other => panic!("expected PolicyDenied, got {:?}", other),
        }
    }
}
