//! RSA key pair generation, public-key extraction, and PEM validation.
//!
//! Generated pairs are always RSA-2048 with the public key in SPKI/PEM and
//! the private key in PKCS#8/PEM. Extraction and validation also accept
//! P-256 keys so envelopes signed with `SHA256withECDSA` can be handled.

use std::thread::{self, JoinHandle};

use chrono::Utc;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::{debug, instrument};

use docseal_contracts::{
    envelope::{KeyKind, KeyPair},
    error::{SignatureError, SignatureResult},
};

/// Modulus size of every generated key, in bits.
pub const RSA_KEY_BITS: usize = 2048;

/// Algorithm tag stored on generated key pairs.
pub const KEY_ALGORITHM: &str = "RSA";

/// Generate a fresh RSA-2048 key pair using the OS CSPRNG.
///
/// Any failure in generation or PEM encoding is reported as
/// `SignatureError::KeyGeneration`.
#[instrument]
pub fn generate_key_pair() -> SignatureResult<KeyPair> {
    let mut rng = rand::rngs::OsRng;

    let private_key = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS).map_err(|e| {
        SignatureError::KeyGeneration {
            reason: format!("RSA key generation failed: {e}"),
        }
    })?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| SignatureError::KeyGeneration {
            reason: format!("PKCS#8 encoding failed: {e}"),
        })?;
    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| SignatureError::KeyGeneration {
            reason: format!("SPKI encoding failed: {e}"),
        })?;

    debug!(bits = public_key.size() * 8, "RSA key pair generated");

    Ok(KeyPair {
        public_key: public_pem,
        private_key: private_pem.to_string(),
        algorithm: KEY_ALGORITHM.to_string(),
        key_length: RSA_KEY_BITS,
        created_at: Utc::now(),
    })
}

/// Run `generate_key_pair` on a dedicated thread.
///
/// RSA generation can take hundreds of milliseconds; callers on a request
/// path join the handle when they actually need the pair.
pub fn generate_key_pair_deferred() -> JoinHandle<SignatureResult<KeyPair>> {
    thread::spawn(generate_key_pair)
}

/// Derive the SPKI/PEM public key from a PKCS#8/PEM private key.
///
/// Returns `SignatureError::KeyFormat` when the input is neither an RSA nor
/// a P-256 PKCS#8 document.
pub fn extract_public_key(private_key_pem: &str) -> SignatureResult<String> {
    if let Ok(private_key) = RsaPrivateKey::from_pkcs8_pem(private_key_pem) {
        return private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| SignatureError::KeyFormat {
                reason: format!("SPKI encoding failed: {e}"),
            });
    }

    ec_public_key_pem(private_key_pem)
}

fn ec_public_key_pem(private_key_pem: &str) -> SignatureResult<String> {
    use p256::pkcs8::{DecodePrivateKey, EncodePublicKey, LineEnding};

    let secret = p256::SecretKey::from_pkcs8_pem(private_key_pem).map_err(|e| {
        SignatureError::KeyFormat {
            reason: format!("not an RSA or P-256 PKCS#8 private key: {e}"),
        }
    })?;
    secret
        .public_key()
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| SignatureError::KeyFormat {
            reason: format!("SPKI encoding failed: {e}"),
        })
}

/// Return true if `key` parses as the claimed kind of PEM key.
///
/// Never fails: malformed input simply yields `false`.
pub fn validate_key_format(key: &str, kind: KeyKind) -> bool {
    match kind {
        KeyKind::Public => {
            use p256::pkcs8::DecodePublicKey as _;
            RsaPublicKey::from_public_key_pem(key).is_ok()
                || p256::PublicKey::from_public_key_pem(key).is_ok()
        }
        KeyKind::Private => {
            use p256::pkcs8::DecodePrivateKey as _;
            RsaPrivateKey::from_pkcs8_pem(key).is_ok()
                || p256::SecretKey::from_pkcs8_pem(key).is_ok()
        }
    }
}

/// Parse an RSA PKCS#8/PEM private key.
pub(crate) fn parse_rsa_private_key(pem: &str) -> SignatureResult<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| SignatureError::KeyFormat {
        reason: format!("invalid RSA private key: {e}"),
    })
}

/// Parse an RSA SPKI/PEM public key.
pub(crate) fn parse_rsa_public_key(pem: &str) -> SignatureResult<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem).map_err(|e| SignatureError::KeyFormat {
        reason: format!("invalid RSA public key: {e}"),
    })
}
