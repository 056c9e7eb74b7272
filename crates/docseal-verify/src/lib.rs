//! # docseal-verify
//!
//! Signature verification for docseal.
//!
//! This crate provides [`engine::VerificationEngine`], which implements the
//! [`docseal_core::traits::SignatureVerifier`] trait. It checks envelopes in
//! two phases:
//!
//! 1. **Integrity**: canonical document hash against the envelope.
//! 2. **Cryptographic**: the signature against the signer's public key.
//!
//! and, for stored records, certificate expiry and timestamp tokens.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use docseal_verify::VerificationEngine;
//!
//! let outcome = VerificationEngine::new().verify_signature(&document, &envelope);
//! if let Some(reason) = outcome.reason {
//!     eprintln!("{reason}: {}", outcome.message);
//! }
//! ```

pub mod engine;

pub use engine::VerificationEngine;
