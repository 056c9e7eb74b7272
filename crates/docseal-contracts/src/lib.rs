//! # docseal-contracts
//!
//! Shared types, wire formats, and error contracts for the docseal signature
//! subsystem.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod document;
pub mod envelope;
pub mod error;
pub mod policy;
pub mod record;
pub mod verify;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use document::{Document, RecordId};
    use envelope::Algorithm;
    use error::SignatureError;
    use policy::PolicyVerdict;
    use record::{SignatureStatus, VerificationDetails};
    use verify::{FailureClass, FailureReason};

    // ── Wire names ───────────────────────────────────────────────────────────

    #[test]
    fn algorithm_serializes_to_java_style_names() {
        assert_eq!(
            serde_json::to_value(Algorithm::Sha256WithRsa).unwrap(),
            json!("SHA256withRSA")
        );
        assert_eq!(
            serde_json::to_value(Algorithm::Sha256WithEcdsa).unwrap(),
            json!("SHA256withECDSA")
        );
        assert_eq!(
            serde_json::to_value(Algorithm::Sha512WithRsa).unwrap(),
            json!("SHA512withRSA")
        );
    }

    #[test]
    fn algorithm_parse_matches_as_str() {
        for alg in Algorithm::ALL {
            assert_eq!(Algorithm::parse(alg.as_str()), Some(alg));
        }
        assert_eq!(Algorithm::parse("MD5withRSA"), None);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(SignatureStatus::PendingVerification).unwrap(),
            json!("pending_verification")
        );
        assert_eq!(SignatureStatus::Revoked.to_string(), "revoked");
        assert!(SignatureStatus::Revoked.is_terminal());
        assert!(!SignatureStatus::Invalid.is_terminal());
    }

    #[test]
    fn failure_reason_codes_and_classes() {
        assert_eq!(
            serde_json::to_value(FailureReason::DocumentModified).unwrap(),
            json!("DOCUMENT_MODIFIED")
        );
        assert_eq!(FailureReason::DocumentModified.class(), FailureClass::Integrity);
        assert_eq!(FailureReason::InvalidSignature.class(), FailureClass::Cryptographic);
        assert_eq!(FailureReason::VerificationError.class(), FailureClass::Cryptographic);
    }

    // ── PolicyVerdict serde round-trip ───────────────────────────────────────

    #[test]
    fn policy_verdict_deny_round_trips() {
        let original = PolicyVerdict::Deny {
            reason: "weak algorithm for finance documents".to_string(),
        };
        let json = serde_json::to_string(&original).unwrap();
        let decoded: PolicyVerdict = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }

    // ── Document ─────────────────────────────────────────────────────────────

    #[test]
    fn document_from_json_dispatches_on_shape() {
        assert!(matches!(
            Document::from_json(json!({ "title": "Flight" })),
            Document::Structured(_)
        ));
        assert_eq!(Document::from_json(json!("plain text")), Document::raw("plain text"));
        assert_eq!(Document::from_json(json!([1, 2])), Document::raw("[1,2]"));
    }

    #[test]
    fn record_id_new_produces_unique_values() {
        let unique: std::collections::HashSet<String> =
            (0..100).map(|_| RecordId::new().to_string()).collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn verification_details_all_passed_requires_every_factor() {
        let mut details = VerificationDetails {
            signature_valid: true,
            certificate_valid: true,
            timestamp_valid: true,
            document_intact: true,
            errors: vec![],
            failures: vec![],
        };
        assert!(details.all_passed());
        details.timestamp_valid = false;
        assert!(!details.all_passed());
    }

    // ── SignatureError display messages ──────────────────────────────────────

    #[test]
    fn error_key_format_display() {
        let err = SignatureError::KeyFormat {
            reason: "not a PEM document".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("malformed key"));
        assert!(msg.contains("not a PEM document"));
    }

    #[test]
    fn error_duplicate_signature_display() {
        let err = SignatureError::DuplicateSignature {
            document: "expense-17".to_string(),
            signer: "alice".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("expense-17"));
        assert!(msg.contains("alice"));
    }

    #[test]
    fn error_concurrent_modification_display() {
        let err = SignatureError::ConcurrentModification {
            record_id: "r-1".to_string(),
            expected: 2,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected version 2"));
        assert!(msg.contains("found 3"));
    }
}
