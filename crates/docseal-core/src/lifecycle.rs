//! Pure lifecycle functions for signature records.
//!
//! Each function takes the current record plus an `AuditContext` and
//! returns a `Transition`: the next record state and the audit entry that
//! was appended to get there. Nothing is persisted here; the caller decides
//! when to write, and can retry a failed write with the same transition.
//!
//! State machine:
//!
//! ```text
//! pending_verification ──verify──▶ valid | invalid
//! valid ◀──verify──▶ invalid
//! any non-revoked ──revoke──▶ revoked        (absorbing)
//! any non-revoked ──expiry sweep──▶ expired
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docseal_contracts::{
    document::{DocumentRef, RecordId, UserRef},
    envelope::{SignatureEnvelope, TimestampToken},
    error::{SignatureError, SignatureResult},
    policy::PolicyDescriptor,
    record::{
        AuditAction, AuditEntry, Certificate, ChainOfTrustEntry, Revocation, SignatureRecord,
        SignatureStatus, Verification, VerificationResult,
    },
};

/// Who is acting, what the record looked like before, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditContext {
    pub performed_by: UserRef,
    pub previous_status: SignatureStatus,
    pub comments: Option<String>,
}

impl AuditContext {
    /// Context for acting on `record` as `performed_by`.
    pub fn for_record(record: &SignatureRecord, performed_by: UserRef) -> Self {
        Self {
            performed_by,
            previous_status: record.status,
            comments: None,
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}

/// A computed, not-yet-persisted lifecycle step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The record after the step, with `audit_entry` already appended.
    pub record: SignatureRecord,
    pub audit_entry: AuditEntry,
}

impl Transition {
    pub fn status_changed(&self) -> bool {
        self.audit_entry.previous_status != self.audit_entry.new_status
    }
}

/// Everything needed to open a new record.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub document: DocumentRef,
    pub signer: UserRef,
    pub envelope: SignatureEnvelope,
    pub certificate: Option<Certificate>,
    pub timestamp_token: Option<TimestampToken>,
    pub chain_of_trust: Vec<ChainOfTrustEntry>,
    pub signature_policy: PolicyDescriptor,
    pub comments: Option<String>,
}

/// Build a new record in `pending_verification` with its `signed` entry.
pub fn open_record(draft: RecordDraft, now: DateTime<Utc>) -> Transition {
    let audit_entry = AuditEntry {
        action: AuditAction::Signed,
        performed_by: draft.signer.clone(),
        timestamp: now,
        comments: draft.comments,
        previous_status: None,
        new_status: Some(SignatureStatus::PendingVerification),
    };

    let record = SignatureRecord {
        id: RecordId::new(),
        version: 0,
        document: draft.document,
        signer: draft.signer,
        envelope: draft.envelope,
        certificate: draft.certificate,
        timestamp_token: draft.timestamp_token,
        status: SignatureStatus::PendingVerification,
        verifications: Vec::new(),
        chain_of_trust: draft.chain_of_trust,
        signature_policy: draft.signature_policy,
        audit_trail: vec![audit_entry.clone()],
        revocation: None,
        created_at: now,
        updated_at: now,
    };

    Transition { record, audit_entry }
}

/// Append `verification` to `record` and move its status accordingly.
///
/// Pending, valid, and invalid records take the status the evidence says.
/// Revoked and expired records keep their status; the evidence is still
/// appended so audits can see it.
pub fn apply_verification(
    record: &SignatureRecord,
    verification: Verification,
    ctx: AuditContext,
) -> Transition {
    let next_status = match record.status {
        SignatureStatus::Revoked | SignatureStatus::Expired => record.status,
        SignatureStatus::PendingVerification | SignatureStatus::Valid | SignatureStatus::Invalid => {
            match verification.result {
                VerificationResult::Valid => SignatureStatus::Valid,
                VerificationResult::Invalid => SignatureStatus::Invalid,
            }
        }
    };

    let comments = ctx.comments.or_else(|| {
        (!verification.details.errors.is_empty()).then(|| verification.details.errors.join("; "))
    });

    let audit_entry = AuditEntry {
        action: AuditAction::Verified,
        performed_by: ctx.performed_by,
        timestamp: verification.verified_at,
        comments,
        previous_status: Some(ctx.previous_status),
        new_status: Some(next_status),
    };

    let mut next = record.clone();
    next.updated_at = verification.verified_at;
    next.verifications.push(verification);
    next.status = next_status;
    next.audit_trail.push(audit_entry.clone());

    Transition {
        record: next,
        audit_entry,
    }
}

/// Revoke `record`. Fails with `AlreadyRevoked` if it already is.
pub fn apply_revocation(
    record: &SignatureRecord,
    revocation: Revocation,
    ctx: AuditContext,
) -> SignatureResult<Transition> {
    if record.status == SignatureStatus::Revoked {
        return Err(SignatureError::AlreadyRevoked {
            record_id: record.id.to_string(),
        });
    }

    let audit_entry = AuditEntry {
        action: AuditAction::Revoked,
        performed_by: ctx.performed_by,
        timestamp: revocation.revoked_at,
        comments: ctx.comments.or_else(|| revocation.details.clone()),
        previous_status: Some(ctx.previous_status),
        new_status: Some(SignatureStatus::Revoked),
    };

    let mut next = record.clone();
    next.updated_at = revocation.revoked_at;
    next.status = SignatureStatus::Revoked;
    next.revocation = Some(revocation);
    next.audit_trail.push(audit_entry.clone());

    Ok(Transition {
        record: next,
        audit_entry,
    })
}

/// The derived, non-persisted expiry condition.
pub fn is_expired(record: &SignatureRecord, now: DateTime<Utc>) -> bool {
    record.is_expired_at(now)
}

/// Reconciliation step: persistable `expired` transition, if one is due.
///
/// Returns `None` when the certificate is still valid (or absent) or the
/// record is already revoked or expired.
pub fn apply_expiry(record: &SignatureRecord, now: DateTime<Utc>, ctx: AuditContext) -> Option<Transition> {
    if matches!(record.status, SignatureStatus::Revoked | SignatureStatus::Expired) || !is_expired(record, now) {
        return None;
    }

    let audit_entry = AuditEntry {
        action: AuditAction::Expired,
        performed_by: ctx.performed_by,
        timestamp: now,
        comments: ctx
            .comments
            .or_else(|| Some("certificate validity window has ended".to_string())),
        previous_status: Some(ctx.previous_status),
        new_status: Some(SignatureStatus::Expired),
    };

    let mut next = record.clone();
    next.updated_at = now;
    next.status = SignatureStatus::Expired;
    next.audit_trail.push(audit_entry.clone());

    Some(Transition {
        record: next,
        audit_entry,
    })
}
