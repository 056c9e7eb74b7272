//! Error types for the docseal signature subsystem.
//!
//! Every fallible operation returns `SignatureResult<T>`. Verification
//! outcomes ("signature invalid", "document modified") are NOT errors: they
//! are reported through `verify::VerificationOutcome` with a reason code.

use thiserror::Error;

/// The unified error type for docseal.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The RSA key pair could not be generated or encoded.
    #[error("key generation failed: {reason}")]
    KeyGeneration { reason: String },

    /// A PEM key could not be parsed.
    #[error("malformed key: {reason}")]
    KeyFormat { reason: String },

    /// Hashing, signing, or encoding failed while producing an envelope.
    #[error("signing failed: {reason}")]
    Signing { reason: String },

    /// Something went wrong inside the verification machinery.
    ///
    /// Never surfaced from the verification engine itself; it is converted
    /// into a `VERIFICATION_ERROR` outcome. Exists so internal helpers can
    /// use `?` before that conversion happens.
    #[error("verification error: {reason}")]
    Verification { reason: String },

    /// The signing policy refused the request.
    #[error("policy denied signing: {reason}")]
    PolicyDenied { reason: String },

    /// A record for this (document, signer) pair already exists.
    #[error("document '{document}' is already signed by '{signer}'")]
    DuplicateSignature { document: String, signer: String },

    /// No record exists with the given id.
    #[error("signature record '{record_id}' not found")]
    RecordNotFound { record_id: String },

    /// The document provider has no document with the given id.
    #[error("document '{document}' not found")]
    DocumentNotFound { document: String },

    /// The record is revoked; revocation is terminal.
    #[error("signature record '{record_id}' is already revoked")]
    AlreadyRevoked { record_id: String },

    /// The stored record changed since it was read.
    #[error("signature record '{record_id}' was modified concurrently (expected version {expected}, found {actual})")]
    ConcurrentModification {
        record_id: String,
        expected: u64,
        actual: u64,
    },

    /// An update tried to rewrite or drop history instead of appending to it.
    #[error("append-only violation on record '{record_id}': {reason}")]
    AppendOnlyViolation { record_id: String, reason: String },

    /// The persistence layer failed to write.
    #[error("store write failed: {reason}")]
    StoreWriteFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the docseal crates.
pub type SignatureResult<T> = Result<T, SignatureError>;
