//! Scenario 2: Tamper Detection
//!
//! The flight expense is approved, then its amount is edited in the database
//! from 120.50 to 130.50. Verification reports `DOCUMENT_MODIFIED` without
//! running any cryptography, and the record moves to `invalid`. Restoring
//! the amount makes the next verification pass again: status follows the
//! current evidence, while every run stays in the history.
//!
//! Sub-cases:
//!   A. Bookkeeping fields (`updatedAt`) change → still valid
//!   B. Amount changes → DOCUMENT_MODIFIED, record `invalid`
//!   C. Amount restored → record `valid` again, three verifications kept
//!   D. Envelope checked against another signer's key → INVALID_SIGNATURE

use serde_json::json;

use docseal_audit::InMemorySignatureStore;
use docseal_contracts::{
    document::{DocumentRef, UserRef},
    error::SignatureResult,
    record::VerificationMethod,
    verify::VerificationOutcome,
};
use docseal_core::traits::DocumentProvider;
use docseal_crypto::keys::generate_key_pair;

use crate::mock_data::MockDocumentProvider;
use crate::scenarios::{build_service, report_ledger, sign_as};

fn describe(outcome: &VerificationOutcome) -> String {
    match outcome.reason {
        None => "valid".to_string(),
        Some(reason) => format!("{} ({})", reason, outcome.message),
    }
}

/// Run Scenario 2: Tamper Detection.
pub fn run_scenario() -> SignatureResult<()> {
    println!("=== Scenario 2: Tamper Detection ===");
    println!();

    let provider = MockDocumentProvider::seeded();
    let store = InMemorySignatureStore::new();
    let service = build_service(&provider, &store)?;

    let key = generate_key_pair()?;
    let record = sign_as(&service, "expense-1001", "maria.santos", &key.private_key, "approved")?;
    let auditor = UserRef::new("internal-audit");
    let doc = DocumentRef::new("expense-1001");

    println!("  Signed expense-1001 as maria.santos → {}", record.status);
    println!();

    // ── Sub-case A: bookkeeping field changes ─────────────────────────────────

    provider.amend("expense-1001", "updatedAt", json!("2026-03-09T12:00:00Z"));
    let outcome = service.verify_signature(&provider.fetch(&doc)?, &record.envelope);
    println!("  Sub-case A: updatedAt edited");
    println!("  Stateless check:        {}", describe(&outcome));
    println!();

    // ── Sub-case B: amount edited ─────────────────────────────────────────────

    provider.amend("expense-1001", "amount", json!(130.50));
    let outcome = service.verify_signature(&provider.fetch(&doc)?, &record.envelope);
    let tampered = service.verify(&record.id, auditor.clone(), VerificationMethod::Manual)?;
    println!("  Sub-case B: amount changed 120.50 → 130.50");
    println!("  Stateless check:        {}", describe(&outcome));
    println!("  Failure class:          {:?}", outcome.class());
    println!("  Record status:          {}", tampered.status);
    if let Some(latest) = tampered.latest_verification() {
        println!(
            "  Evidence:               intact={} signature={} certificate={} timestamp={}",
            latest.details.document_intact,
            latest.details.signature_valid,
            latest.details.certificate_valid,
            latest.details.timestamp_valid
        );
    }
    println!();

    // ── Sub-case C: amount restored ───────────────────────────────────────────

    provider.amend("expense-1001", "amount", json!(120.50));
    let restored = service.verify(&record.id, auditor, VerificationMethod::Manual)?;
    println!("  Sub-case C: amount restored to 120.50");
    println!("  Record status:          {}", restored.status);
    println!("  Verifications kept:     {}", restored.verifications.len());
    println!();

    // ── Sub-case D: wrong public key ──────────────────────────────────────────

    let impostor = generate_key_pair()?;
    let mut forged = record.envelope.clone();
    forged.signer_public_key = impostor.public_key;
    let outcome = service.verify_signature(&provider.fetch(&doc)?, &forged);
    println!("  Sub-case D: envelope presented with another signer's public key");
    println!("  Stateless check:        {}", describe(&outcome));
    println!("  Failure class:          {:?}", outcome.class());
    println!();

    report_ledger(&store);
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use docseal_contracts::{
        record::{SignatureStatus, VerificationResult},
        verify::{FailureClass, FailureReason},
    };

    use super::*;

    #[test]
    fn test_scenario_runs() {
        assert!(run_scenario().is_ok());
    }

    #[test]
    fn test_edit_flips_status_and_restore_flips_back() {
        let provider = MockDocumentProvider::seeded();
        let store = InMemorySignatureStore::new();
        let service = build_service(&provider, &store).unwrap();
        let key = generate_key_pair().unwrap();
        let record = sign_as(&service, "expense-1001", "maria.santos", &key.private_key, "ok").unwrap();
        let doc = DocumentRef::new("expense-1001");

        provider.amend("expense-1001", "amount", json!(130.50));
        let outcome = service.verify_signature(&provider.fetch(&doc).unwrap(), &record.envelope);
        assert_eq!(outcome.reason, Some(FailureReason::DocumentModified));
        assert_eq!(outcome.class(), Some(FailureClass::Integrity));

        let invalid = service
            .verify(&record.id, UserRef::new("auditor"), VerificationMethod::Manual)
            .unwrap();
        assert_eq!(invalid.status, SignatureStatus::Invalid);
        let latest = invalid.latest_verification().unwrap();
        assert_eq!(latest.result, VerificationResult::Invalid);
        assert!(!latest.details.document_intact);
        assert!(latest.details.certificate_valid);
        assert!(latest.details.timestamp_valid);

        provider.amend("expense-1001", "amount", json!(120.50));
        let valid = service
            .verify(&record.id, UserRef::new("auditor"), VerificationMethod::Manual)
            .unwrap();
        assert_eq!(valid.status, SignatureStatus::Valid);
        assert_eq!(valid.verifications.len(), 3);
        assert!(store.verify_integrity());
    }

    #[test]
    fn test_bookkeeping_fields_do_not_break_signature() {
        let provider = MockDocumentProvider::seeded();
        let store = InMemorySignatureStore::new();
        let service = build_service(&provider, &store).unwrap();
        let key = generate_key_pair().unwrap();
        let record = sign_as(&service, "expense-1002", "li.wen", &key.private_key, "ok").unwrap();

        provider.amend("expense-1002", "updatedAt", json!("2027-01-01T00:00:00Z"));
        provider.amend("expense-1002", "__v", json!(4));
        let doc = provider.fetch(&DocumentRef::new("expense-1002")).unwrap();

        assert!(service.verify_signature(&doc, &record.envelope).valid);
    }

    #[test]
    fn test_other_signers_key_is_invalid_signature() {
        let provider = MockDocumentProvider::seeded();
        let store = InMemorySignatureStore::new();
        let service = build_service(&provider, &store).unwrap();
        let key = generate_key_pair().unwrap();
        let other = generate_key_pair().unwrap();
        let record = sign_as(&service, "expense-1001", "maria.santos", &key.private_key, "ok").unwrap();

        let mut forged = record.envelope.clone();
        forged.signer_public_key = other.public_key;
        let doc = provider.fetch(&DocumentRef::new("expense-1001")).unwrap();

        let outcome = service.verify_signature(&doc, &forged);
        assert_eq!(outcome.reason, Some(FailureReason::InvalidSignature));
        assert_eq!(outcome.class(), Some(FailureClass::Cryptographic));
    }
}
