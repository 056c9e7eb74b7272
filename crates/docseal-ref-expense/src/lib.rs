//! # docseal-ref-expense
//!
//! Expense-approval reference runtime for the docseal signature subsystem.
//!
//! Demonstrates four scenarios using mock data:
//!
//! 1. **Expense Approval Signing**: policy-gated signing with timestamp
//!    token, certificate, and verify-on-sign; duplicate and denied requests.
//! 2. **Tamper Detection**: an edited amount surfaces as `DOCUMENT_MODIFIED`,
//!    a foreign key as `INVALID_SIGNATURE`.
//! 3. **Revocation and Expiry**: terminal revocation and the reconciliation
//!    sweep that persists certificate expiry.
//! 4. **Signer Enrollment**: off-thread key generation and passphrase hashing.
//!
//! All data is hardcoded and fictional. No external systems are contacted.

pub mod mock_data;
pub mod scenarios;
