//! Scenario 3: Revocation and Expiry
//!
//! Two approvals end their lives in different ways:
//!
//!   - The hotel approval is revoked after the signer's key is reported
//!     compromised. Later verification runs are recorded for audit but the
//!     record stays `revoked`, and a second revocation is refused.
//!   - The conference approval simply outlives its one-year certificate.
//!     Expiry is derived on read until the reconciliation sweep persists it.

use chrono::{Duration, Utc};

use docseal_audit::InMemorySignatureStore;
use docseal_contracts::{
    document::UserRef,
    error::{SignatureError, SignatureResult},
    record::{RevocationReason, VerificationMethod},
};
use docseal_crypto::keys::generate_key_pair;

use crate::mock_data::MockDocumentProvider;
use crate::scenarios::{build_service, report_ledger, sign_as};

/// How far past signing the sweep runs: beyond the 365-day certificate.
pub const SWEEP_OFFSET_DAYS: i64 = 400;

/// Run Scenario 3: Revocation and Expiry.
pub fn run_scenario() -> SignatureResult<()> {
    println!("=== Scenario 3: Revocation and Expiry ===");
    println!();

    let provider = MockDocumentProvider::seeded();
    let store = InMemorySignatureStore::new();
    let service = build_service(&provider, &store)?;

    let dana_key = generate_key_pair()?;
    let li_key = generate_key_pair()?;

    let hotel = sign_as(&service, "expense-1002", "dana.okafor", &dana_key.private_key, "offsite lodging")?;
    let conference = sign_as(&service, "expense-1003", "li.wen", &li_key.private_key, "training budget")?;
    println!("  expense-1002 signed by dana.okafor → {}", hotel.status);
    println!("  expense-1003 signed by li.wen      → {}", conference.status);
    println!();

    // ── Revocation ────────────────────────────────────────────────────────────

    let security = UserRef::new("security-office");
    let revoked = service.revoke(
        &hotel.id,
        security.clone(),
        RevocationReason::KeyCompromise,
        Some("laptop reported stolen 2026-03-10".to_string()),
    )?;
    println!("  Revoked expense-1002:   {}", revoked.status);

    let rechecked = service.verify(&hotel.id, UserRef::new("internal-audit"), VerificationMethod::Manual)?;
    println!(
        "  Re-verified:            status {} ({} verification(s) on file)",
        rechecked.status,
        rechecked.verifications.len()
    );

    match service.revoke(&hotel.id, security, RevocationReason::Other, None) {
        Err(SignatureError::AlreadyRevoked { .. }) => {
            println!("  Second revocation:      REFUSED (revocation is terminal)");
        }
        Ok(_) => println!("  Second revocation:      unexpectedly accepted"),
        Err(e) => return Err(e),
    }
    println!();

    // ── Expiry ────────────────────────────────────────────────────────────────

    let later = Utc::now() + Duration::days(SWEEP_OFFSET_DAYS);
    println!("  Looking {} days ahead:", SWEEP_OFFSET_DAYS);
    println!(
        "  expense-1003 expired?   {} (derived), stored status {}",
        service.is_expired(&conference.id, later)?,
        service.record(&conference.id)?.status
    );

    let swept = service.reconcile_expired(UserRef::system(), later)?;
    println!("  Reconciliation sweep:   {} record(s) transitioned", swept.len());
    println!("  expense-1003 status:    {}", service.record(&conference.id)?.status);
    println!("  expense-1002 status:    {}", service.record(&hotel.id)?.status);
    println!();

    report_ledger(&store);
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use docseal_contracts::record::{AuditAction, SignatureStatus};

    use super::*;

    #[test]
    fn test_scenario_runs() {
        assert!(run_scenario().is_ok());
    }

    #[test]
    fn test_revoked_record_is_never_resurrected() {
        let provider = MockDocumentProvider::seeded();
        let store = InMemorySignatureStore::new();
        let service = build_service(&provider, &store).unwrap();
        let key = generate_key_pair().unwrap();
        let record = sign_as(&service, "expense-1002", "dana.okafor", &key.private_key, "ok").unwrap();

        let revoked = service
            .revoke(&record.id, UserRef::new("admin"), RevocationReason::SignerRequest, None)
            .unwrap();
        assert_eq!(revoked.status, SignatureStatus::Revoked);
        let revocation = revoked.revocation.as_ref().unwrap();
        assert_eq!(revocation.reason, RevocationReason::SignerRequest);
        assert_eq!(revocation.revoked_by, UserRef::new("admin"));

        for _ in 0..2 {
            let after = service
                .verify(&record.id, UserRef::new("auditor"), VerificationMethod::Manual)
                .unwrap();
            assert_eq!(after.status, SignatureStatus::Revoked);
        }

        let stored = service.record(&record.id).unwrap();
        assert_eq!(stored.verifications.len(), 3);
        let last = stored.audit_trail.last().unwrap();
        assert_eq!(last.action, AuditAction::Verified);
        assert_eq!(last.previous_status, Some(SignatureStatus::Revoked));
        assert_eq!(last.new_status, Some(SignatureStatus::Revoked));
    }

    #[test]
    fn test_sweep_skips_revoked_and_persists_expiry() {
        let provider = MockDocumentProvider::seeded();
        let store = InMemorySignatureStore::new();
        let service = build_service(&provider, &store).unwrap();
        let key = generate_key_pair().unwrap();
        let revoked = sign_as(&service, "expense-1002", "dana.okafor", &key.private_key, "ok").unwrap();
        let lapsing = sign_as(&service, "expense-1003", "dana.okafor", &key.private_key, "ok").unwrap();
        service
            .revoke(&revoked.id, UserRef::new("admin"), RevocationReason::Superseded, None)
            .unwrap();

        let later = Utc::now() + Duration::days(SWEEP_OFFSET_DAYS);
        assert!(service.is_expired(&lapsing.id, later).unwrap());
        assert!(!service.is_expired(&lapsing.id, Utc::now()).unwrap());

        let swept = service.reconcile_expired(UserRef::system(), later).unwrap();
        assert_eq!(swept, vec![lapsing.id]);

        let expired = service.record(&lapsing.id).unwrap();
        assert_eq!(expired.status, SignatureStatus::Expired);
        assert_eq!(expired.audit_trail.last().unwrap().action, AuditAction::Expired);
        assert_eq!(service.record(&revoked.id).unwrap().status, SignatureStatus::Revoked);
        assert!(store.verify_integrity());
    }
}
