//! Verification outcome types.
//!
//! A failed verification is an ordinary result, not an error. Callers match
//! on `FailureReason` to render precise messaging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::envelope::Algorithm;

/// Why a signature check did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// The document's canonical hash no longer matches the envelope.
    DocumentModified,
    /// The signature does not verify under the envelope's public key.
    InvalidSignature,
    /// Key parsing, decoding, or the verifier itself failed.
    VerificationError,
}

impl FailureReason {
    pub fn class(&self) -> FailureClass {
        match self {
            FailureReason::DocumentModified => FailureClass::Integrity,
            FailureReason::InvalidSignature | FailureReason::VerificationError => {
                FailureClass::Cryptographic
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::DocumentModified => "DOCUMENT_MODIFIED",
            FailureReason::InvalidSignature => "INVALID_SIGNATURE",
            FailureReason::VerificationError => "VERIFICATION_ERROR",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad category of a verification failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// The math did not check out.
    Cryptographic,
    /// The document changed after signing.
    Integrity,
    /// Certificate expired or timestamp token rejected.
    Policy,
}

/// Detail flags reported alongside a stateless signature check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureCheck {
    pub document_intact: bool,
    pub signature_valid: bool,
    pub algorithm: Algorithm,
    /// Signing time taken from the envelope.
    pub timestamp: DateTime<Utc>,
}

/// Result of `verify_signature(document, envelope)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    pub message: String,
    pub details: SignatureCheck,
}

impl VerificationOutcome {
    pub fn class(&self) -> Option<FailureClass> {
        self.reason.map(|r| r.class())
    }
}
