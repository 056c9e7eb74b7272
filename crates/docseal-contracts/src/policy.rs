//! Signing policy verdict and evaluation context types.
//!
//! The signing policy consumes a `SigningContext` and produces a
//! `PolicyVerdict`. Anything other than `Allow` blocks signing.

use serde::{Deserialize, Serialize};

use crate::envelope::Algorithm;

/// The decision emitted by the signing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyVerdict {
    Allow,
    Deny {
        /// Human-readable explanation, surfaced in the `PolicyDenied` error.
        reason: String,
    },
}

/// Everything the signing policy needs to make a decision.
///
/// Plain strings so policy rules can be written without depending on the
/// full contract type hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningContext {
    pub document: String,
    pub signer: String,
    pub algorithm: String,
}

impl SigningContext {
    pub fn new(document: impl Into<String>, signer: impl Into<String>, algorithm: Algorithm) -> Self {
        Self {
            document: document.into(),
            signer: signer.into(),
            algorithm: algorithm.as_str().to_string(),
        }
    }
}

/// Identifies the policy a record was signed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDescriptor {
    pub policy_id: String,
    pub version: String,
}

/// Record-level settings a signing policy hands to the signature service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySettings {
    pub descriptor: PolicyDescriptor,
    /// Signing algorithm used when the caller does not pick one.
    pub default_algorithm: Algorithm,
    /// Run the full verification protocol right after the record is created.
    pub verify_on_sign: bool,
    /// Attach a timestamp token at signing time.
    pub issue_timestamp: bool,
    pub timestamp_authority: String,
    /// Validity window of the stub certificate; `None` attaches no certificate.
    pub certificate_validity_days: Option<i64>,
    pub certificate_issuer: String,
    /// Authorities asserted (not validated) in every new record.
    pub chain_of_trust: Vec<String>,
}
