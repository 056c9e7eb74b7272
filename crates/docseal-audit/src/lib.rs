//! # docseal-audit
//!
//! Signature record persistence with an append-only, SHA-256 hash-chained
//! audit ledger.
//!
//! ## Overview
//!
//! [`InMemorySignatureStore`] implements
//! [`SignatureStore`](docseal_core::traits::SignatureStore). It enforces
//! `(document, signer)` uniqueness, optimistic versioning, and append-only
//! history, and mirrors every accepted audit entry into an `AuditEvent`
//! that links to the previous event via its hash. Tampering with any event
//! breaks the chain and is detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docseal_audit::InMemorySignatureStore;
//!
//! let store = InMemorySignatureStore::new();
//! let service = SignatureService::new(provider, Box::new(store.clone()), verifier, policy);
//! // ... sign, verify, revoke ...
//! assert!(store.verify_integrity());
//! let log = store.export_log();
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_event, verify_chain};
pub use event::{AuditEvent, AuditLog};
pub use memory::InMemorySignatureStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
