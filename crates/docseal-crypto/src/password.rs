//! Password hashing with PBKDF2-HMAC-SHA512.
//!
//! Parameters are fixed: 100,000 iterations, 64-byte derived key, 32-byte
//! random salt. The salt travels hex encoded, and that hex string is what
//! gets fed to PBKDF2, so a stored `(hash, salt)` pair is self-contained.
//!
//! Derivation is deliberately slow. Keep it off latency-sensitive paths;
//! `hash_password_offloaded` moves it onto a worker thread.

use std::thread::{self, JoinHandle};

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use subtle::ConstantTimeEq;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derived key length in bytes.
pub const HASH_LEN: usize = 64;

/// Random salt length in bytes (before hex encoding).
pub const SALT_LEN: usize = 32;

/// A password hash together with the salt that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    /// Hex encoded derived key (128 chars).
    pub hash: String,
    /// Hex encoded salt.
    pub salt: String,
}

/// Hash `password`, generating a fresh random salt when `salt` is `None`.
pub fn hash_password(password: &str, salt: Option<&str>) -> PasswordHash {
    let salt = match salt {
        Some(s) => s.to_string(),
        None => generate_salt(),
    };

    let mut derived = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), PBKDF2_ITERATIONS, &mut derived);

    PasswordHash {
        hash: hex::encode(derived),
        salt,
    }
}

/// Re-derive the hash for `password` with `salt` and compare it to `hash`.
///
/// The hex digests must match exactly; the comparison runs in constant time.
pub fn verify_password(password: &str, hash: &str, salt: &str) -> bool {
    let derived = hash_password(password, Some(salt)).hash;
    derived.as_bytes().ct_eq(hash.as_bytes()).into()
}

/// Run `hash_password` with a random salt on a dedicated thread.
pub fn hash_password_offloaded(password: impl Into<String>) -> JoinHandle<PasswordHash> {
    let password = password.into();
    thread::spawn(move || hash_password(&password, None))
}

fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
