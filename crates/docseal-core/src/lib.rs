//! # docseal-core
//!
//! The signature record lifecycle and the service that runs it.
//!
//! This crate provides:
//! - The four collaborator traits (`DocumentProvider`, `SignatureStore`,
//!   `SignatureVerifier`, `SigningPolicy`)
//! - Pure lifecycle transitions over `SignatureRecord`
//! - The `SignatureService` that wires them together in the correct trust order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docseal_core::{SignatureService, service::SignRequest};
//!
//! let service = SignatureService::new(provider, store, verifier, policy);
//! let record = service.sign(SignRequest::new(document, signer, private_key_pem))?;
//! ```

pub mod lifecycle;
pub mod service;
pub mod traits;

pub use service::{PreparedTransition, SignRequest, SignatureService};
