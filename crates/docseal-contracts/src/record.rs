//! The persisted signature record and its history entries.
//!
//! A `SignatureRecord` is created when a document is signed and is never
//! deleted. Its `verifications` and `audit_trail` only ever grow; status
//! changes are driven by the lifecycle functions in `docseal-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    document::{DocumentRef, RecordId, UserRef},
    envelope::{SignatureEnvelope, TimestampToken},
    policy::PolicyDescriptor,
    verify::FailureClass,
};

/// Lifecycle status of a signature record.
///
/// `Revoked` is absorbing: nothing moves a record out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStatus {
    PendingVerification,
    Valid,
    Invalid,
    Revoked,
    /// Persisted only by the reconciliation sweep.
    Expired,
}

impl SignatureStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SignatureStatus::Revoked)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureStatus::PendingVerification => "pending_verification",
            SignatureStatus::Valid => "valid",
            SignatureStatus::Invalid => "invalid",
            SignatureStatus::Revoked => "revoked",
            SignatureStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simplified certificate attached to a record.
///
/// This is an internal stand-in, not an X.509 certificate: only the
/// validity window is ever checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub subject: String,
    pub issuer: String,
    pub serial_number: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

impl Certificate {
    /// Expired once `valid_to` is reached: a certificate is valid only while `valid_to > now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_to <= now
    }
}

/// One asserted link in the chain of trust. Never independently validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainOfTrustEntry {
    pub authority: String,
    pub asserted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    Automatic,
    Manual,
    ThirdParty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationResult {
    Valid,
    Invalid,
}

/// Every intermediate boolean from one verification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDetails {
    pub signature_valid: bool,
    pub certificate_valid: bool,
    pub timestamp_valid: bool,
    pub document_intact: bool,
    pub errors: Vec<String>,
    /// Class of each failed factor, in check order.
    #[serde(default)]
    pub failures: Vec<FailureClass>,
}

impl VerificationDetails {
    /// Logical AND of the four factors.
    pub fn all_passed(&self) -> bool {
        self.signature_valid && self.certificate_valid && self.timestamp_valid && self.document_intact
    }
}

/// One entry in a record's verification history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub verified_by: UserRef,
    pub verified_at: DateTime<Utc>,
    pub result: VerificationResult,
    pub details: VerificationDetails,
    pub method: VerificationMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Signed,
    Verified,
    Revoked,
    Expired,
}

/// One entry in a record's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub action: AuditAction,
    pub performed_by: UserRef,
    pub timestamp: DateTime<Utc>,
    pub comments: Option<String>,
    pub previous_status: Option<SignatureStatus>,
    pub new_status: Option<SignatureStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationReason {
    KeyCompromise,
    DocumentModified,
    SignerRequest,
    Superseded,
    Other,
}

/// Metadata recorded when a record is revoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revocation {
    pub revoked_at: DateTime<Utc>,
    pub revoked_by: UserRef,
    pub reason: RevocationReason,
    pub details: Option<String>,
}

/// The persisted signature entity.
///
/// Invariant: at most one record exists per `(document, signer)` pair; the
/// store enforces this on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    pub id: RecordId,
    /// Optimistic-concurrency counter, bumped by the store on every update.
    pub version: u64,
    pub document: DocumentRef,
    pub signer: UserRef,
    pub envelope: SignatureEnvelope,
    pub certificate: Option<Certificate>,
    pub timestamp_token: Option<TimestampToken>,
    pub status: SignatureStatus,
    pub verifications: Vec<Verification>,
    pub chain_of_trust: Vec<ChainOfTrustEntry>,
    pub signature_policy: PolicyDescriptor,
    pub audit_trail: Vec<AuditEntry>,
    pub revocation: Option<Revocation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SignatureRecord {
    /// The derived `expired` condition, true from `valid_to` onward. Computed on read, never stored here.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.certificate
            .as_ref()
            .is_some_and(|cert| cert.is_expired_at(now))
    }

    pub fn latest_verification(&self) -> Option<&Verification> {
        self.verifications.last()
    }
}
