//! # docseal-crypto
//!
//! The cryptographic leaves of the docseal signature subsystem. Everything
//! here is a free function or a small value type: there is no shared state.
//!
//! - [`canonical`] — deterministic, field-order-independent document form
//! - [`keys`] — RSA-2048 key pairs, public-key extraction, PEM validation
//! - [`password`] — PBKDF2-HMAC-SHA512 password hashing
//! - [`signing`] — envelope production and raw signature checks
//! - [`timestamp`] — the simplified internal timestamp authority
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docseal_crypto::{keys::generate_key_pair, signing::sign_document};
//!
//! let pair = generate_key_pair()?;
//! let envelope = sign_document(&document, &pair.private_key, Default::default())?;
//! ```

pub mod canonical;
pub mod keys;
pub mod password;
pub mod signing;
pub mod timestamp;

pub use canonical::{canonicalize, document_hash};
pub use keys::{extract_public_key, generate_key_pair, validate_key_format};
pub use password::{hash_password, verify_password, PasswordHash};
pub use signing::{sign_document, sign_document_with};
pub use timestamp::{generate_timestamp, verify_timestamp, TimestampAuthority};
