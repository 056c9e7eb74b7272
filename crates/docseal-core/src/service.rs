//! The docseal signature service: the persisted signing and verification
//! pipeline.
//!
//! Signing order:
//!
//!   Duplicate check → Fetch document → Policy → Sign → Timestamp/Certificate
//!   → Create record → (optional) Verify
//!
//! The private key is never touched unless `SigningPolicy::evaluate()`
//! returns `PolicyVerdict::Allow`. Verification and revocation compute their
//! transition in memory first (`prepare_*`), then write it (`commit`); a
//! failed write can be retried with the same evidence.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use docseal_contracts::{
    document::{Document, DocumentRef, RecordId, UserRef},
    envelope::{Algorithm, SignatureEnvelope},
    error::{SignatureError, SignatureResult},
    policy::{PolicySettings, PolicyVerdict, SigningContext},
    record::{Certificate, ChainOfTrustEntry, Revocation, RevocationReason, SignatureRecord, VerificationMethod},
    verify::VerificationOutcome,
};
use docseal_crypto::{signing::sign_document_with, timestamp::TimestampAuthority};

use crate::{
    lifecycle::{self, AuditContext, RecordDraft, Transition},
    traits::{DocumentProvider, SignatureStore, SignatureVerifier, SigningPolicy},
};

/// A request to sign one document as one signer.
#[derive(Debug, Clone)]
pub struct SignRequest {
    pub document: DocumentRef,
    pub signer: UserRef,
    /// PKCS#8 / PEM private key. Used for this call only, never stored.
    pub private_key: String,
    /// Overrides the policy's default algorithm.
    pub algorithm: Option<Algorithm>,
    /// Caller metadata merged into the envelope.
    pub metadata: Map<String, Value>,
    pub comments: Option<String>,
}

impl SignRequest {
    pub fn new(document: DocumentRef, signer: UserRef, private_key: impl Into<String>) -> Self {
        Self {
            document,
            signer,
            private_key: private_key.into(),
            algorithm: None,
            metadata: Map::new(),
            comments: None,
        }
    }
}

/// A lifecycle step computed against a specific stored version.
#[derive(Debug, Clone)]
pub struct PreparedTransition {
    /// The version the transition was computed from.
    pub expected_version: u64,
    pub transition: Transition,
}

/// Orchestrates signing, verification, revocation, and expiry sweeps.
///
/// Construct one service per deployment; it holds no per-record state. All
/// collaborators are injected.
pub struct SignatureService {
    provider: Box<dyn DocumentProvider>,
    store: Box<dyn SignatureStore>,
    verifier: Box<dyn SignatureVerifier>,
    policy: Box<dyn SigningPolicy>,
}

impl SignatureService {
    pub fn new(
        provider: Box<dyn DocumentProvider>,
        store: Box<dyn SignatureStore>,
        verifier: Box<dyn SignatureVerifier>,
        policy: Box<dyn SigningPolicy>,
    ) -> Self {
        Self {
            provider,
            store,
            verifier,
            policy,
        }
    }

    pub fn settings(&self) -> &PolicySettings {
        self.policy.settings()
    }

    /// Sign a document and persist a new record.
    ///
    /// # Errors
    ///
    /// `DuplicateSignature` if the pair is already signed, `DocumentNotFound`
    /// from the provider, `PolicyDenied` when the policy refuses, and
    /// `Signing` for key or crypto failures, and `ConfigError` when the
    /// policy's certificate validity cannot be represented. When the policy
    /// asks for verification on sign, the returned record already carries
    /// it. Once the record is created, a failed follow-up verification is
    /// logged and the stored pending record is returned.
    pub fn sign(&self, request: SignRequest) -> SignatureResult<SignatureRecord> {
        let SignRequest {
            document,
            signer,
            private_key,
            algorithm,
            metadata,
            comments,
        } = request;

        // ── Step 1: Uniqueness ──────────────────────────────────────────────
        //
        // Checked up front so a duplicate never costs an RSA operation; the
        // store enforces it again on create.
        if self.store.find(&document, &signer)?.is_some() {
            return Err(SignatureError::DuplicateSignature {
                document: document.0,
                signer: signer.0,
            });
        }

        // ── Step 2: Fetch the signable view ─────────────────────────────────
        let content = self.provider.fetch(&document)?;

        // ── Step 3: Policy gate ─────────────────────────────────────────────
        let settings = self.policy.settings().clone();
        let algorithm = algorithm.unwrap_or(settings.default_algorithm);
        let ctx = SigningContext::new(document.0.clone(), signer.0.clone(), algorithm);

        if let PolicyVerdict::Deny { reason } = self.policy.evaluate(&ctx)? {
            warn!(document = %document, signer = %signer, %algorithm, %reason, "signing policy denied request");
            return Err(SignatureError::PolicyDenied { reason });
        }

        // ── Step 4: Sign ────────────────────────────────────────────────────
        let envelope = sign_document_with(&content, &private_key, algorithm, metadata)?;
        let now = envelope.timestamp;

        // ── Step 5: Attestations ────────────────────────────────────────────
        let timestamp_token = settings
            .issue_timestamp
            .then(|| TimestampAuthority::new(settings.timestamp_authority.clone()).issue(&envelope.document_hash));

        let certificate = settings
            .certificate_validity_days
            .map(|days| issue_certificate(&signer, &settings.certificate_issuer, now, days))
            .transpose()?;

        let chain_of_trust = settings
            .chain_of_trust
            .iter()
            .map(|authority| ChainOfTrustEntry {
                authority: authority.clone(),
                asserted_at: now,
            })
            .collect();

        // ── Step 6: Persist ─────────────────────────────────────────────────
        let opened = lifecycle::open_record(
            RecordDraft {
                document,
                signer,
                envelope,
                certificate,
                timestamp_token,
                chain_of_trust,
                signature_policy: settings.descriptor.clone(),
                comments,
            },
            now,
        );
        self.store.create(&opened.record)?;

        info!(
            record_id = %opened.record.id,
            document = %opened.record.document,
            signer = %opened.record.signer,
            document_hash = %opened.record.envelope.document_hash,
            "signature record created"
        );

        // ── Step 7: Verify by policy ────────────────────────────────────────
        if settings.verify_on_sign {
            match self.verify(&opened.record.id, UserRef::system(), VerificationMethod::Automatic) {
                Ok(verified) => return Ok(verified),
                Err(e) => {
                    warn!(
                        record_id = %opened.record.id,
                        error = %e,
                        "verification on sign failed, record left pending"
                    );
                }
            }
        }

        Ok(opened.record)
    }

    /// Stateless check of an envelope against a document.
    pub fn verify_signature(&self, document: &Document, envelope: &SignatureEnvelope) -> VerificationOutcome {
        self.verifier.verify_signature(document, envelope)
    }

    /// Compute a verification transition without writing it.
    pub fn prepare_verification(
        &self,
        id: &RecordId,
        verified_by: UserRef,
        method: VerificationMethod,
    ) -> SignatureResult<PreparedTransition> {
        self.prepare_verification_at(id, verified_by, method, Utc::now())
    }

    /// As `prepare_verification`, evaluating time-dependent checks at `now`.
    pub fn prepare_verification_at(
        &self,
        id: &RecordId,
        verified_by: UserRef,
        method: VerificationMethod,
        now: DateTime<Utc>,
    ) -> SignatureResult<PreparedTransition> {
        let record = self.store.read(id)?;
        let content = self.provider.fetch(&record.document)?;

        let verification = self
            .verifier
            .verify_record(&content, &record, &verified_by, method, now);

        debug!(
            record_id = %record.id,
            result = ?verification.result,
            errors = verification.details.errors.len(),
            "verification evidence computed"
        );

        let ctx = AuditContext::for_record(&record, verified_by);
        Ok(PreparedTransition {
            expected_version: record.version,
            transition: lifecycle::apply_verification(&record, verification, ctx),
        })
    }

    /// Write a prepared transition.
    ///
    /// Safe to call again with the same value after a transient store
    /// failure. A `ConcurrentModification` error means the record moved on;
    /// prepare again from the new state.
    pub fn commit(&self, prepared: &PreparedTransition) -> SignatureResult<SignatureRecord> {
        let stored = self
            .store
            .update(prepared.transition.record.clone(), prepared.expected_version)?;

        if prepared.transition.status_changed() {
            info!(
                record_id = %stored.id,
                previous_status = ?prepared.transition.audit_entry.previous_status,
                new_status = %stored.status,
                action = ?prepared.transition.audit_entry.action,
                "signature status changed"
            );
        }

        Ok(stored)
    }

    /// Run the full verification protocol on a record and persist the result.
    pub fn verify(
        &self,
        id: &RecordId,
        verified_by: UserRef,
        method: VerificationMethod,
    ) -> SignatureResult<SignatureRecord> {
        let prepared = self.prepare_verification(id, verified_by, method)?;
        self.commit(&prepared)
    }

    /// Compute a revocation transition without writing it.
    pub fn prepare_revocation(
        &self,
        id: &RecordId,
        revoked_by: UserRef,
        reason: RevocationReason,
        details: Option<String>,
    ) -> SignatureResult<PreparedTransition> {
        let record = self.store.read(id)?;
        let revocation = Revocation {
            revoked_at: Utc::now(),
            revoked_by: revoked_by.clone(),
            reason,
            details,
        };
        let ctx = AuditContext::for_record(&record, revoked_by);
        Ok(PreparedTransition {
            expected_version: record.version,
            transition: lifecycle::apply_revocation(&record, revocation, ctx)?,
        })
    }

    /// Revoke a record. Terminal: the record can never leave `revoked`.
    pub fn revoke(
        &self,
        id: &RecordId,
        revoked_by: UserRef,
        reason: RevocationReason,
        details: Option<String>,
    ) -> SignatureResult<SignatureRecord> {
        let prepared = self.prepare_revocation(id, revoked_by, reason, details)?;
        self.commit(&prepared)
    }

    /// Load a record.
    pub fn record(&self, id: &RecordId) -> SignatureResult<SignatureRecord> {
        self.store.read(id)
    }

    /// The derived expiry condition for a stored record.
    pub fn is_expired(&self, id: &RecordId, now: DateTime<Utc>) -> SignatureResult<bool> {
        Ok(lifecycle::is_expired(&self.store.read(id)?, now))
    }

    /// Persist `expired` on every record whose certificate has lapsed.
    ///
    /// Records that change underneath the sweep are skipped and picked up
    /// by the next run. Returns the ids that were transitioned.
    pub fn reconcile_expired(&self, performed_by: UserRef, now: DateTime<Utc>) -> SignatureResult<Vec<RecordId>> {
        let mut expired = Vec::new();

        for record in self.store.list()? {
            let ctx = AuditContext::for_record(&record, performed_by.clone());
            let Some(transition) = lifecycle::apply_expiry(&record, now, ctx) else {
                continue;
            };

            let prepared = PreparedTransition {
                expected_version: record.version,
                transition,
            };
            match self.commit(&prepared) {
                Ok(stored) => expired.push(stored.id),
                Err(SignatureError::ConcurrentModification { record_id, .. }) => {
                    warn!(record_id = %record_id, "record changed during expiry sweep, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        info!(count = expired.len(), "expiry reconciliation complete");
        Ok(expired)
    }
}

/// Build the simplified stand-in certificate for a new record.
///
/// Fails with `ConfigError` when the validity period cannot be represented
/// as a date.
fn issue_certificate(
    signer: &UserRef,
    issuer: &str,
    now: DateTime<Utc>,
    validity_days: i64,
) -> SignatureResult<Certificate> {
    let valid_to = Duration::try_days(validity_days)
        .and_then(|period| now.checked_add_signed(period))
        .ok_or_else(|| SignatureError::ConfigError {
            reason: format!("certificate validity of {validity_days} days is out of range"),
        })?;

    Ok(Certificate {
        subject: signer.0.clone(),
        issuer: issuer.to_string(),
        serial_number: uuid::Uuid::new_v4().simple().to_string(),
        valid_from: now,
        valid_to,
    })
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, Utc};
    use serde_json::json;

    use docseal_contracts::{
        document::{Document, DocumentRef, RecordId, UserRef},
        envelope::SignatureEnvelope,
        error::{SignatureError, SignatureResult},
        policy::{PolicyDescriptor, PolicySettings, PolicyVerdict, SigningContext},
        record::{
            SignatureRecord, SignatureStatus, Verification, VerificationDetails, VerificationMethod,
            VerificationResult, RevocationReason,
        },
        verify::{SignatureCheck, VerificationOutcome},
    };
    use docseal_crypto::keys::generate_key_pair;

    use crate::traits::{DocumentProvider, SignatureStore, SignatureVerifier, SigningPolicy};

    use super::{SignRequest, SignatureService};

    // ── Mock helpers ─────────────────────────────────────────────────────────

    fn settings() -> PolicySettings {
        PolicySettings {
            descriptor: PolicyDescriptor {
                policy_id: "test-policy".to_string(),
                version: "1".to_string(),
            },
            default_algorithm: Default::default(),
            verify_on_sign: false,
            issue_timestamp: true,
            timestamp_authority: "test-tsa".to_string(),
            certificate_validity_days: Some(30),
            certificate_issuer: "test-ca".to_string(),
            chain_of_trust: vec!["test-root".to_string()],
        }
    }

    /// A document provider backed by a fixed map.
    struct MockProvider {
        documents: HashMap<String, Document>,
    }

    impl MockProvider {
        fn with_flight() -> Self {
            let mut documents = HashMap::new();
            documents.insert(
                "expense-1".to_string(),
                Document::from_json(json!({ "title": "Flight", "amount": 120.50 })),
            );
            Self { documents }
        }
    }

    impl DocumentProvider for MockProvider {
        fn fetch(&self, document: &DocumentRef) -> SignatureResult<Document> {
            self.documents
                .get(&document.0)
                .cloned()
                .ok_or_else(|| SignatureError::DocumentNotFound {
                    document: document.0.clone(),
                })
        }
    }

    /// A store that keeps records in a Vec and checks versions.
    #[derive(Clone, Default)]
    struct MockStore {
        records: Arc<Mutex<Vec<SignatureRecord>>>,
        reject_updates: bool,
    }

    impl SignatureStore for MockStore {
        fn create(&self, record: &SignatureRecord) -> SignatureResult<()> {
            let mut records = self.records.lock().unwrap();
            if records
                .iter()
                .any(|r| r.document == record.document && r.signer == record.signer)
            {
                return Err(SignatureError::DuplicateSignature {
                    document: record.document.0.clone(),
                    signer: record.signer.0.clone(),
                });
            }
            records.push(record.clone());
            Ok(())
        }

        fn read(&self, id: &RecordId) -> SignatureResult<SignatureRecord> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == *id)
                .cloned()
                .ok_or_else(|| SignatureError::RecordNotFound {
                    record_id: id.to_string(),
                })
        }

        fn find(&self, document: &DocumentRef, signer: &UserRef) -> SignatureResult<Option<SignatureRecord>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.document == *document && r.signer == *signer)
                .cloned())
        }

        fn list(&self) -> SignatureResult<Vec<SignatureRecord>> {
            Ok(self.records.lock().unwrap().clone())
        }

        fn update(&self, mut record: SignatureRecord, expected_version: u64) -> SignatureResult<SignatureRecord> {
            if self.reject_updates {
                return Err(SignatureError::StoreWriteFailed {
                    reason: "disk full".to_string(),
                });
            }
            let mut records = self.records.lock().unwrap();
            let slot = records.iter_mut().find(|r| r.id == record.id).unwrap();
            if slot.version != expected_version {
                return Err(SignatureError::ConcurrentModification {
                    record_id: record.id.to_string(),
                    expected: expected_version,
                    actual: slot.version,
                });
            }
            record.version = expected_version + 1;
            *slot = record.clone();
            Ok(record)
        }
    }

    /// A verifier that can be configured to pass or fail.
    struct MockVerifier {
        pass: bool,
    }

    impl SignatureVerifier for MockVerifier {
        fn verify_signature(&self, _document: &Document, envelope: &SignatureEnvelope) -> VerificationOutcome {
            VerificationOutcome {
                valid: self.pass,
                reason: None,
                message: String::new(),
                details: SignatureCheck {
                    document_intact: self.pass,
                    signature_valid: self.pass,
                    algorithm: envelope.algorithm,
                    timestamp: envelope.timestamp,
                },
            }
        }

        fn verify_record(
            &self,
            _document: &Document,
            _record: &SignatureRecord,
            verified_by: &UserRef,
            method: VerificationMethod,
            now: chrono::DateTime<Utc>,
        ) -> Verification {
            Verification {
                verified_by: verified_by.clone(),
                verified_at: now,
                result: if self.pass {
                    VerificationResult::Valid
                } else {
                    VerificationResult::Invalid
                },
                details: VerificationDetails {
                    signature_valid: self.pass,
                    certificate_valid: true,
                    timestamp_valid: true,
                    document_intact: true,
                    errors: vec![],
                    failures: vec![],
                },
                method,
            }
        }
    }

    /// A policy that always returns a pre-configured verdict.
    struct MockPolicy {
        verdict: PolicyVerdict,
        settings: PolicySettings,
    }

    impl SigningPolicy for MockPolicy {
        fn evaluate(&self, _ctx: &SigningContext) -> SignatureResult<PolicyVerdict> {
            Ok(self.verdict.clone())
        }

        fn settings(&self) -> &PolicySettings {
            &self.settings
        }
    }

    fn service(pass: bool, verdict: PolicyVerdict, settings: PolicySettings) -> (SignatureService, MockStore) {
        let store = MockStore::default();
        let service = SignatureService::new(
            Box::new(MockProvider::with_flight()),
            Box::new(store.clone()),
            Box::new(MockVerifier { pass }),
            Box::new(MockPolicy { verdict, settings }),
        );
        (service, store)
    }

    fn request(private_key: &str) -> SignRequest {
        SignRequest::new(DocumentRef::new("expense-1"), UserRef::new("alice"), private_key)
    }

    // ── Tests ────────────────────────────────────────────────────────────────

    #[test]
    fn test_sign_creates_pending_record_with_attestations() {
        let pair = generate_key_pair().unwrap();
        let (service, store) = service(true, PolicyVerdict::Allow, settings());

        let record = service.sign(request(&pair.private_key)).unwrap();

        assert_eq!(record.status, SignatureStatus::PendingVerification);
        assert_eq!(record.envelope.signer_public_key, pair.public_key);
        assert_eq!(record.timestamp_token.as_ref().unwrap().authority_id, "test-tsa");
        assert_eq!(record.certificate.as_ref().unwrap().issuer, "test-ca");
        assert_eq!(record.chain_of_trust[0].authority, "test-root");
        assert_eq!(record.signature_policy.policy_id, "test-policy");
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_policy_deny_blocks_signing() {
        let pair = generate_key_pair().unwrap();
        let (service, store) = service(
            true,
            PolicyVerdict::Deny {
                reason: "no finance signatures on Sundays".to_string(),
            },
            settings(),
        );

        match service.sign(request(&pair.private_key)) {
            Err(SignatureError::PolicyDenied { reason }) => assert!(reason.contains("Sundays")),
            other => panic!("expected PolicyDenied, got {:?}", other),
        }
        assert!(store.list().unwrap().is_empty(), "denied requests must not create records");
    }

    #[test]
    fn test_duplicate_pair_is_rejected() {
        let pair = generate_key_pair().unwrap();
        let (service, _store) = service(true, PolicyVerdict::Allow, settings());

        service.sign(request(&pair.private_key)).unwrap();
        match service.sign(request(&pair.private_key)) {
            Err(SignatureError::DuplicateSignature { document, signer }) => {
                assert_eq!(document, "expense-1");
                assert_eq!(signer, "alice");
            }
            other => panic!("expected DuplicateSignature, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_document_is_reported() {
        let pair = generate_key_pair().unwrap();
        let (service, _store) = service(true, PolicyVerdict::Allow, settings());
        let req = SignRequest::new(DocumentRef::new("missing"), UserRef::new("alice"), pair.private_key);

        assert!(matches!(service.sign(req), Err(SignatureError::DocumentNotFound { .. })));
    }

    #[test]
    fn test_verify_on_sign_runs_automatically() {
        let pair = generate_key_pair().unwrap();
        let mut s = settings();
        s.verify_on_sign = true;
        let (service, _store) = service(true, PolicyVerdict::Allow, s);

        let record = service.sign(request(&pair.private_key)).unwrap();

        assert_eq!(record.status, SignatureStatus::Valid);
        assert_eq!(record.version, 1);
        assert_eq!(record.verifications[0].method, VerificationMethod::Automatic);
        assert_eq!(record.verifications[0].verified_by, UserRef::system());
    }

    #[test]
    fn test_verify_on_sign_write_failure_returns_pending_record() {
        let pair = generate_key_pair().unwrap();
        let mut s = settings();
        s.verify_on_sign = true;
        let store = MockStore {
            reject_updates: true,
            ..Default::default()
        };
        let service = SignatureService::new(
            Box::new(MockProvider::with_flight()),
            Box::new(store.clone()),
            Box::new(MockVerifier { pass: true }),
            Box::new(MockPolicy {
                verdict: PolicyVerdict::Allow,
                settings: s,
            }),
        );

        let record = service.sign(request(&pair.private_key)).unwrap();

        assert_eq!(record.status, SignatureStatus::PendingVerification);
        assert!(record.verifications.is_empty());
        assert_eq!(store.read(&record.id).unwrap().version, 0);
        assert!(matches!(
            service.sign(request(&pair.private_key)),
            Err(SignatureError::DuplicateSignature { .. })
        ));
    }

    #[test]
    fn test_out_of_range_certificate_validity_is_config_error() {
        let pair = generate_key_pair().unwrap();
        let mut s = settings();
        s.certificate_validity_days = Some(100_000_000);
        let (service, store) = service(true, PolicyVerdict::Allow, s);

        match service.sign(request(&pair.private_key)) {
            Err(SignatureError::ConfigError { reason }) => {
                assert!(reason.contains("100000000"), "unexpected reason: {reason}")
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_failed_verification_marks_invalid() {
        let pair = generate_key_pair().unwrap();
        let (service, _store) = service(false, PolicyVerdict::Allow, settings());

        let record = service.sign(request(&pair.private_key)).unwrap();
        let verified = service
            .verify(&record.id, UserRef::new("auditor"), VerificationMethod::Manual)
            .unwrap();

        assert_eq!(verified.status, SignatureStatus::Invalid);
        assert_eq!(verified.audit_trail.len(), 2);
    }

    #[test]
    fn test_stale_prepared_transition_is_rejected_and_retry_succeeds() {
        let pair = generate_key_pair().unwrap();
        let (service, _store) = service(true, PolicyVerdict::Allow, settings());
        let record = service.sign(request(&pair.private_key)).unwrap();

        let first = service
            .prepare_verification(&record.id, UserRef::new("a"), VerificationMethod::Manual)
            .unwrap();
        let second = service
            .prepare_verification(&record.id, UserRef::new("b"), VerificationMethod::Manual)
            .unwrap();

        service.commit(&first).unwrap();
        assert!(matches!(
            service.commit(&second),
            Err(SignatureError::ConcurrentModification { expected: 0, actual: 1, .. })
        ));

        // Re-preparing from the current state succeeds and keeps both runs.
        let retried = service
            .prepare_verification(&record.id, UserRef::new("b"), VerificationMethod::Manual)
            .unwrap();
        let stored = service.commit(&retried).unwrap();
        assert_eq!(stored.verifications.len(), 2);
    }

    #[test]
    fn test_revoked_record_stays_revoked() {
        let pair = generate_key_pair().unwrap();
        let (service, _store) = service(true, PolicyVerdict::Allow, settings());
        let record = service.sign(request(&pair.private_key)).unwrap();

        service
            .revoke(&record.id, UserRef::new("admin"), RevocationReason::SignerRequest, None)
            .unwrap();
        let after = service
            .verify(&record.id, UserRef::new("auditor"), VerificationMethod::Manual)
            .unwrap();

        assert_eq!(after.status, SignatureStatus::Revoked);
        assert!(matches!(
            service.revoke(&record.id, UserRef::new("admin"), RevocationReason::Other, None),
            Err(SignatureError::AlreadyRevoked { .. })
        ));
    }

    #[test]
    fn test_reconcile_expired_persists_expiry() {
        let pair = generate_key_pair().unwrap();
        let (service, _store) = service(true, PolicyVerdict::Allow, settings());
        let record = service.sign(request(&pair.private_key)).unwrap();

        let later = Utc::now() + Duration::days(31);
        assert!(service.is_expired(&record.id, later).unwrap());
        assert_eq!(service.record(&record.id).unwrap().status, SignatureStatus::PendingVerification);

        let swept = service.reconcile_expired(UserRef::system(), later).unwrap();
        assert_eq!(swept, vec![record.id]);
        assert_eq!(service.record(&record.id).unwrap().status, SignatureStatus::Expired);

        // Nothing left to do on a second pass.
        assert!(service.reconcile_expired(UserRef::system(), later).unwrap().is_empty());
    }
}
