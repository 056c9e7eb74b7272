//! Envelope production and raw signature checks.
//!
//! Signing pipeline:
//!
//!   canonicalize → SHA-256 hex digest → sign(digest) → base64 → envelope
//!
//! The signed message is the 64-char hex digest itself, so the algorithm's
//! own hash runs over that string. `verify_digest_signature` is the inverse
//! used by the verification engine.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use rsa::pkcs1v15;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use serde_json::{Map, Value};
use sha2::{Sha256, Sha512};
use tracing::{debug, warn};

use docseal_contracts::{
    document::Document,
    envelope::{Algorithm, EnvelopeMetadata, SignatureEnvelope},
    error::{SignatureError, SignatureResult},
};

use crate::{
    canonical::document_hash,
    keys::{extract_public_key, parse_rsa_private_key, parse_rsa_public_key},
};

/// The only encoding envelopes use for signature bytes.
pub const SIGNATURE_ENCODING: &str = "base64";

/// Metadata keys owned by the signer; caller values for these are ignored.
const RESERVED_METADATA_KEYS: &[&str] = &["signatureSize", "encoding"];

/// Sign `document` with an RSA private key using `SHA256withRSA`.
pub fn sign_document(
    document: &Document,
    private_key_pem: &str,
    metadata: Map<String, Value>,
) -> SignatureResult<SignatureEnvelope> {
    sign_document_with(document, private_key_pem, Algorithm::default(), metadata)
}

/// Sign `document` with the given algorithm.
///
/// Every failure (unparseable key, wrong key type for the algorithm, public
/// key derivation) is reported as `SignatureError::Signing` carrying the
/// underlying cause.
pub fn sign_document_with(
    document: &Document,
    private_key_pem: &str,
    algorithm: Algorithm,
    metadata: Map<String, Value>,
) -> SignatureResult<SignatureEnvelope> {
    let document_hash = document_hash(document);

    let signature = sign_digest(private_key_pem, algorithm, &document_hash).map_err(signing_error)?;
    let signer_public_key = extract_public_key(private_key_pem).map_err(signing_error)?;

    let mut extra = metadata;
    for key in RESERVED_METADATA_KEYS {
        if extra.remove(*key).is_some() {
            warn!(key = %key, "caller metadata tried to override a reserved envelope key");
        }
    }

    debug!(
        algorithm = %algorithm,
        document_hash = %document_hash,
        signature_size = signature.len(),
        "document signed"
    );

    Ok(SignatureEnvelope {
        digital_signature: STANDARD.encode(&signature),
        document_hash,
        algorithm,
        timestamp: Utc::now(),
        signer_public_key,
        metadata: EnvelopeMetadata {
            signature_size: signature.len(),
            encoding: SIGNATURE_ENCODING.to_string(),
            extra,
        },
    })
}

/// Sign the hex digest string with `algorithm`.
pub fn sign_digest(private_key_pem: &str, algorithm: Algorithm, digest_hex: &str) -> SignatureResult<Vec<u8>> {
    let message = digest_hex.as_bytes();
    match algorithm {
        Algorithm::Sha256WithRsa => {
            let key = parse_rsa_private_key(private_key_pem)?;
            Ok(pkcs1v15::SigningKey::<Sha256>::new(key).sign(message).to_vec())
        }
        Algorithm::Sha512WithRsa => {
            let key = parse_rsa_private_key(private_key_pem)?;
            Ok(pkcs1v15::SigningKey::<Sha512>::new(key).sign(message).to_vec())
        }
        Algorithm::Sha256WithEcdsa => {
            use p256::pkcs8::DecodePrivateKey;

            let key = p256::ecdsa::SigningKey::from_pkcs8_pem(private_key_pem).map_err(|e| {
                SignatureError::KeyFormat {
                    reason: format!("invalid P-256 private key: {e}"),
                }
            })?;
            let signature: p256::ecdsa::Signature = key.sign(message);
            Ok(signature.to_der().as_bytes().to_vec())
        }
    }
}

/// Check `signature` over the hex digest string with `public_key_pem`.
///
/// `Ok(false)` means the signature is well-formed but does not verify.
/// `Err` means the key or signature could not even be decoded.
pub fn verify_digest_signature(
    public_key_pem: &str,
    algorithm: Algorithm,
    digest_hex: &str,
    signature: &[u8],
) -> SignatureResult<bool> {
    let message = digest_hex.as_bytes();
    match algorithm {
        Algorithm::Sha256WithRsa => {
            let key = parse_rsa_public_key(public_key_pem)?;
            let sig = decode_rsa_signature(signature)?;
            Ok(pkcs1v15::VerifyingKey::<Sha256>::new(key).verify(message, &sig).is_ok())
        }
        Algorithm::Sha512WithRsa => {
            let key = parse_rsa_public_key(public_key_pem)?;
            let sig = decode_rsa_signature(signature)?;
            Ok(pkcs1v15::VerifyingKey::<Sha512>::new(key).verify(message, &sig).is_ok())
        }
        Algorithm::Sha256WithEcdsa => {
            use p256::pkcs8::DecodePublicKey;

            let key = p256::ecdsa::VerifyingKey::from_public_key_pem(public_key_pem).map_err(|e| {
                SignatureError::KeyFormat {
                    reason: format!("invalid P-256 public key: {e}"),
                }
            })?;
            let sig = p256::ecdsa::Signature::from_der(signature).map_err(|e| {
                SignatureError::Verification {
                    reason: format!("invalid ECDSA signature encoding: {e}"),
                }
            })?;
            Ok(key.verify(message, &sig).is_ok())
        }
    }
}

/// Decode a base64 envelope signature.
pub fn decode_signature(encoded: &str) -> SignatureResult<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| SignatureError::Verification {
            reason: format!("signature is not valid base64: {e}"),
        })
}

fn decode_rsa_signature(signature: &[u8]) -> SignatureResult<pkcs1v15::Signature> {
    pkcs1v15::Signature::try_from(signature).map_err(|e| SignatureError::Verification {
        reason: format!("invalid RSA signature bytes: {e}"),
    })
}

fn signing_error(e: SignatureError) -> SignatureError {
    match e {
        SignatureError::Signing { .. } => e,
        other => SignatureError::Signing {
            reason: other.to_string(),
        },
    }
}
