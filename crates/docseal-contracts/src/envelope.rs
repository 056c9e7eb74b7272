//! Key material and signature envelope types.
//!
//! These are the wire-facing shapes: field names serialize in camelCase and
//! algorithm names use their Java-style identifiers (`SHA256withRSA`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Signature algorithms that can appear in an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "SHA256withRSA")]
    Sha256WithRsa,
    #[serde(rename = "SHA256withECDSA")]
    Sha256WithEcdsa,
    #[serde(rename = "SHA512withRSA")]
    Sha512WithRsa,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Sha256WithRsa,
        Algorithm::Sha256WithEcdsa,
        Algorithm::Sha512WithRsa,
    ];

    /// The identifier used on the wire and in policy files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sha256WithRsa => "SHA256withRSA",
            Algorithm::Sha256WithEcdsa => "SHA256withECDSA",
            Algorithm::Sha512WithRsa => "SHA512withRSA",
        }
    }

    /// Parse a wire identifier. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of a key pair a PEM string claims to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
}

/// A generated key pair. Owned by the caller and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    /// SPKI / PEM encoded public key.
    pub public_key: String,
    /// PKCS#8 / PEM encoded private key.
    pub private_key: String,
    /// Always `"RSA"` for generated pairs.
    pub algorithm: String,
    /// Modulus size in bits.
    pub key_length: usize,
    pub created_at: DateTime<Utc>,
}

/// Metadata carried inside a `SignatureEnvelope`.
///
/// `signature_size` and `encoding` are always set by the signer; any other
/// caller-supplied keys are kept in `extra` and flattened on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeMetadata {
    /// Raw signature length in bytes (before base64).
    pub signature_size: usize,
    /// Always `"base64"`.
    pub encoding: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The output of signing: one signature bound to exactly one document hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEnvelope {
    /// Base64-encoded signature bytes.
    pub digital_signature: String,
    /// Lowercase hex SHA-256 of the canonical document (64 chars).
    pub document_hash: String,
    pub algorithm: Algorithm,
    /// When the signature was produced (serialized as RFC 3339).
    pub timestamp: DateTime<Utc>,
    /// SPKI / PEM public key derived from the signing key.
    pub signer_public_key: String,
    pub metadata: EnvelopeMetadata,
}

/// An issued time-attestation token.
///
/// `token` is the opaque base64 blob; `timestamp` and `authority_id` are
/// the same values it embeds, surfaced for convenience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampToken {
    pub token: String,
    pub timestamp: DateTime<Utc>,
    pub authority_id: String,
}
