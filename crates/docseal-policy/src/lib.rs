//! # docseal-policy
//!
//! A TOML-driven, deny-by-default signing policy for docseal.
//!
//! ## Overview
//!
//! This crate provides [`TomlSigningPolicy`], which implements the
//! [`SigningPolicy`](docseal_core::traits::SigningPolicy) trait. A policy
//! file carries a `[policy]` section (identity, default algorithm,
//! timestamping, certificate, and auto-verify settings) and ordered
//! `[[rules]]`. The first matching rule wins. If no rule matches, signing is
//! denied.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use docseal_policy::TomlSigningPolicy;
//!
//! let policy = TomlSigningPolicy::from_file(Path::new("policies/expense.toml"))?;
//! // Pass `policy` to `docseal_core::SignatureService::new(...)`.
//! ```
//!
//! ## Rule matching
//!
//! Each rule has `algorithm`, `signer`, and `document` patterns. `"*"`
//! matches anything and a trailing `*` matches by prefix.

pub mod engine;
pub mod rule;

pub use engine::TomlSigningPolicy;
pub use rule::{PolicyConfig, PolicySection, RuleVerdict, SigningRule, MAX_CERTIFICATE_VALIDITY_DAYS};

// ── Tests ─────────────────────────────────────────────────────────────────────
