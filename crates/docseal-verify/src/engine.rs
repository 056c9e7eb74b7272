//! Multi-factor signature verifier for docseal.
//!
//! `VerificationEngine` implements the `SignatureVerifier` trait from
//! `docseal-core`. A stateless check runs in two phases:
//!
//! 1. **Integrity**: the document's canonical hash is compared against the
//!    envelope's `documentHash`. A mismatch short-circuits before any
//!    cryptography runs.
//! 2. **Cryptographic**: the signature is checked against the hash with the
//!    envelope's public key and algorithm.
//!
//! The per-record protocol adds certificate expiry and timestamp-token
//! checks, and collects every failure before returning so auditors see the
//! full picture in one pass. Nothing here returns an error: "invalid" is an
//! ordinary outcome.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use docseal_contracts::{
    document::{Document, UserRef},
    envelope::SignatureEnvelope,
    error::SignatureResult,
    record::{SignatureRecord, Verification, VerificationDetails, VerificationMethod, VerificationResult},
    verify::{FailureClass, FailureReason, SignatureCheck, VerificationOutcome},
};
use docseal_core::traits::SignatureVerifier;
use docseal_crypto::{
    canonical::document_hash,
    signing::{decode_signature, verify_digest_signature},
    timestamp::verify_timestamp,
};

pub const MSG_VALID: &str = "Signature is valid";
pub const MSG_DOCUMENT_MODIFIED: &str = "Document has been modified since signing";
pub const MSG_INVALID_SIGNATURE: &str = "Signature does not match the signer's public key";

/// The docseal signature verifier. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationEngine;

impl VerificationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Decode and check the signature bytes. Any failure to even parse the
    /// key or signature comes back as `Err`.
    fn check_signature(envelope: &SignatureEnvelope) -> SignatureResult<bool> {
        let signature = decode_signature(&envelope.digital_signature)?;
        verify_digest_signature(
            &envelope.signer_public_key,
            envelope.algorithm,
            &envelope.document_hash,
            &signature,
        )
    }
}

impl SignatureVerifier for VerificationEngine {
    fn verify_signature(&self, document: &Document, envelope: &SignatureEnvelope) -> VerificationOutcome {
        let mut details = SignatureCheck {
            document_intact: false,
            signature_valid: false,
            algorithm: envelope.algorithm,
            timestamp: envelope.timestamp,
        };

        // ── Phase 1: Integrity ───────────────────────────────────────────────
        let actual_hash = document_hash(document);
        if actual_hash != envelope.document_hash {
            warn!(
                expected = %envelope.document_hash,
                actual = %actual_hash,
                "document hash mismatch"
            );
            return VerificationOutcome {
                valid: false,
                reason: Some(FailureReason::DocumentModified),
                message: MSG_DOCUMENT_MODIFIED.to_string(),
                details,
            };
        }
        details.document_intact = true;

        // ── Phase 2: Cryptographic ───────────────────────────────────────────
        match Self::check_signature(envelope) {
            Ok(true) => {
                details.signature_valid = true;
                debug!(algorithm = %envelope.algorithm, "signature verified");
                VerificationOutcome {
                    valid: true,
                    reason: None,
                    message: MSG_VALID.to_string(),
                    details,
                }
            }
            Ok(false) => {
                warn!(algorithm = %envelope.algorithm, "signature rejected by public key");
                VerificationOutcome {
                    valid: false,
                    reason: Some(FailureReason::InvalidSignature),
                    message: MSG_INVALID_SIGNATURE.to_string(),
                    details,
                }
            }
            Err(e) => {
                warn!(error = %e, "signature could not be checked");
                VerificationOutcome {
                    valid: false,
                    reason: Some(FailureReason::VerificationError),
                    message: e.to_string(),
                    details,
                }
            }
        }
    }

    /// Run every factor and report all of them.
    ///
    /// A missing certificate counts as valid, as does a missing timestamp
    /// token. The token is checked against the envelope's document hash,
    /// which is what it attests.
    fn verify_record(
        &self,
        document: &Document,
        record: &SignatureRecord,
        verified_by: &UserRef,
        method: VerificationMethod,
        now: DateTime<Utc>,
    ) -> Verification {
        let mut errors = Vec::new();
        let mut failures = Vec::new();

        let outcome = self.verify_signature(document, &record.envelope);
        if let Some(class) = outcome.class() {
            errors.push(outcome.message.clone());
            failures.push(class);
        }

        let certificate_valid = match &record.certificate {
            Some(cert) if cert.is_expired_at(now) => {
                errors.push(format!("certificate {} expired at {}", cert.serial_number, cert.valid_to));
                failures.push(FailureClass::Policy);
                false
            }
            _ => true,
        };

        let timestamp_valid = match &record.timestamp_token {
            Some(token) if !verify_timestamp(&token.token, &record.envelope.document_hash) => {
                errors.push(format!("timestamp token from '{}' is invalid", token.authority_id));
                failures.push(FailureClass::Policy);
                false
            }
            _ => true,
        };

        let details = VerificationDetails {
            // A modified document never reaches the crypto step, so its
            // signature is reported as unchecked (false).
            signature_valid: outcome.details.signature_valid,
            certificate_valid,
            timestamp_valid,
            document_intact: outcome.details.document_intact,
            errors,
            failures,
        };

        let result = if details.all_passed() {
            VerificationResult::Valid
        } else {
            VerificationResult::Invalid
        };

        debug!(
            record_id = %record.id,
            verified_by = %verified_by,
            passed = details.all_passed(),
            failure_count = details.errors.len(),
            "record verification complete"
        );

        Verification {
            verified_by: verified_by.clone(),
            verified_at: now,
            result,
            details,
            method,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
