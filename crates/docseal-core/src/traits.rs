//! Collaborator trait definitions for docseal.
//!
//! These four traits are the complete boundary between the signature core
//! and the outside world:
//!
//! - `DocumentProvider`   — supplies the signable view of a document by id
//! - `SignatureStore`     — create / read / update-with-append persistence
//! - `SignatureVerifier`  — the multi-factor verification protocol
//! - `SigningPolicy`      — trusted gate evaluated before any key is touched
//!
//! `SignatureService` wires them together in the correct order.

use chrono::{DateTime, Utc};

use docseal_contracts::{
    document::{Document, DocumentRef, RecordId, UserRef},
    envelope::SignatureEnvelope,
    error::SignatureResult,
    policy::{PolicySettings, PolicyVerdict, SigningContext},
    record::{SignatureRecord, Verification, VerificationMethod},
    verify::VerificationOutcome,
};

/// Supplies documents in their signable form.
pub trait DocumentProvider: Send + Sync {
    /// Return the canonical-fields view of the document with id `document`.
    ///
    /// Returns `SignatureError::DocumentNotFound` for unknown ids.
    fn fetch(&self, document: &DocumentRef) -> SignatureResult<Document>;
}

/// Persistence for signature records.
///
/// Implementations must enforce three rules:
///
/// 1. `(document, signer)` is unique across all records.
/// 2. `update` succeeds only when `expected_version` equals the stored
///    version; the stored version is then incremented.
/// 3. `update` may only append to `verifications` and `audit_trail`;
///    rewriting or dropping history is rejected.
pub trait SignatureStore: Send + Sync {
    /// Persist a new record. Fails with `DuplicateSignature` if the pair
    /// already has a record.
    fn create(&self, record: &SignatureRecord) -> SignatureResult<()>;

    /// Load a record. Fails with `RecordNotFound` for unknown ids.
    fn read(&self, id: &RecordId) -> SignatureResult<SignatureRecord>;

    /// Look up the record for a `(document, signer)` pair.
    fn find(&self, document: &DocumentRef, signer: &UserRef) -> SignatureResult<Option<SignatureRecord>>;

    /// Every stored record, in creation order.
    fn list(&self) -> SignatureResult<Vec<SignatureRecord>>;

    /// Replace the stored record with `record` and return what was stored.
    fn update(&self, record: SignatureRecord, expected_version: u64) -> SignatureResult<SignatureRecord>;
}

/// The verification engine.
///
/// Implementations never return errors for "signature invalid" or "document
/// modified"; those are ordinary outcomes.
pub trait SignatureVerifier: Send + Sync {
    /// Stateless check of `envelope` against `document`.
    fn verify_signature(&self, document: &Document, envelope: &SignatureEnvelope) -> VerificationOutcome;

    /// Full per-record protocol: signature, integrity, certificate, and
    /// timestamp. Returns the evidence; applying it to the record is the
    /// lifecycle's job.
    fn verify_record(
        &self,
        document: &Document,
        record: &SignatureRecord,
        verified_by: &UserRef,
        method: VerificationMethod,
        now: DateTime<Utc>,
    ) -> Verification;
}

/// Decides whether a signing request may proceed and how records are built.
pub trait SigningPolicy: Send + Sync {
    /// Evaluate whether `ctx` may be signed. Anything but `Allow` blocks.
    fn evaluate(&self, ctx: &SigningContext) -> SignatureResult<PolicyVerdict>;

    /// Record-level settings (timestamping, certificate, auto-verify).
    fn settings(&self) -> &PolicySettings;
}
