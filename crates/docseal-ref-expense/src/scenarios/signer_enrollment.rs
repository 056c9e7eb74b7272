//! Scenario 4: Signer Enrollment
//!
//! A new approver is enrolled. Both expensive operations run off the calling
//! thread at the same time: RSA-2048 key generation and PBKDF2 hashing of the
//! approver's signing passphrase. The key pair is then checked and used for
//! a first approval.

use docseal_audit::InMemorySignatureStore;
use docseal_contracts::{
    envelope::{KeyKind, KeyPair},
    error::{SignatureError, SignatureResult},
};
use docseal_crypto::{
    keys::{extract_public_key, generate_key_pair_deferred, validate_key_format},
    password::{hash_password_offloaded, verify_password, PasswordHash, PBKDF2_ITERATIONS},
};

use crate::mock_data::MockDocumentProvider;
use crate::scenarios::{build_service, report_ledger, short_hash, sign_as};

/// Everything an approver needs before their first signature.
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub user: String,
    pub keys: KeyPair,
    pub passphrase: PasswordHash,
}

/// Generate keys and hash the passphrase concurrently, then sanity-check
/// the resulting key material.
pub fn enroll(user: &str, passphrase: &str) -> SignatureResult<Enrollment> {
    let keygen = generate_key_pair_deferred();
    let hashing = hash_password_offloaded(passphrase);

    let keys = keygen.join().map_err(|_| SignatureError::KeyGeneration {
        reason: "key generation worker panicked".to_string(),
    })??;
    let passphrase = hashing.join().map_err(|_| SignatureError::KeyGeneration {
        reason: "password hashing worker panicked".to_string(),
    })?;

    if !validate_key_format(&keys.private_key, KeyKind::Private)
        || !validate_key_format(&keys.public_key, KeyKind::Public)
        || extract_public_key(&keys.private_key)? != keys.public_key
    {
        return Err(SignatureError::KeyGeneration {
            reason: format!("generated key material for '{user}' failed validation"),
        });
    }

    Ok(Enrollment {
        user: user.to_string(),
        keys,
        passphrase,
    })
}

/// Run Scenario 4: Signer Enrollment.
pub fn run_scenario() -> SignatureResult<()> {
    println!("=== Scenario 4: Signer Enrollment ===");
    println!();

    let enrollment = enroll("priya.raman", "correct horse battery staple")?;

    println!("  Approver:               {}", enrollment.user);
    println!(
        "  Key pair:               {} {} bits, created {}",
        enrollment.keys.algorithm,
        enrollment.keys.key_length,
        enrollment.keys.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Passphrase hash:        PBKDF2-HMAC-SHA512, {} iterations, salt {}…",
        PBKDF2_ITERATIONS,
        short_hash(&enrollment.passphrase.salt)
    );
    println!(
        "  Correct passphrase:     {}",
        verify_password(
            "correct horse battery staple",
            &enrollment.passphrase.hash,
            &enrollment.passphrase.salt
        )
    );
    println!(
        "  Wrong passphrase:       {}",
        verify_password("Tr0ub4dor&3", &enrollment.passphrase.hash, &enrollment.passphrase.salt)
    );
    println!();

    let provider = MockDocumentProvider::seeded();
    let store = InMemorySignatureStore::new();
    let service = build_service(&provider, &store)?;

    let record = sign_as(
        &service,
        "expense-1003",
        &enrollment.user,
        &enrollment.keys.private_key,
        "first approval after enrollment",
    )?;
    println!("  First approval:         expense-1003 → {}", record.status);
    println!(
        "  Envelope key matches:   {}",
        record.envelope.signer_public_key == enrollment.keys.public_key
    );
    println!();

    report_ledger(&store);
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use docseal_crypto::keys::{KEY_ALGORITHM, RSA_KEY_BITS};

    use super::*;

    #[test]
    fn test_scenario_runs() {
        assert!(run_scenario().is_ok());
    }

    #[test]
    fn test_enrollment_produces_usable_credentials() {
        let enrollment = enroll("priya.raman", "s3cret").unwrap();

        assert_eq!(enrollment.keys.algorithm, KEY_ALGORITHM);
        assert_eq!(enrollment.keys.key_length, RSA_KEY_BITS);
        assert!(verify_password("s3cret", &enrollment.passphrase.hash, &enrollment.passphrase.salt));
        assert!(!verify_password("S3cret", &enrollment.passphrase.hash, &enrollment.passphrase.salt));
    }

    #[test]
    fn test_two_enrollments_get_distinct_salts_and_keys() {
        let a = enroll("a", "same passphrase").unwrap();
        let b = enroll("b", "same passphrase").unwrap();

        assert_ne!(a.passphrase.salt, b.passphrase.salt);
        assert_ne!(a.passphrase.hash, b.passphrase.hash);
        assert_ne!(a.keys.public_key, b.keys.public_key);
    }
}
