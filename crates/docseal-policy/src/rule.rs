//! Signing policy rule types and configuration schema.
//!
//! A `PolicyConfig` is deserialized from TOML. It holds a `[policy]` section
//! with record-level settings and an ordered list of `[[rules]]`. Rules are
//! evaluated in declaration order; the first matching rule wins. If no rule
//! matches, the policy denies by default.

use serde::{Deserialize, Serialize};

use docseal_contracts::{
    envelope::Algorithm,
    policy::{PolicyDescriptor, PolicySettings},
};
use docseal_crypto::timestamp::DEFAULT_AUTHORITY_ID;

pub const DEFAULT_CERTIFICATE_ISSUER: &str = "docseal-internal-ca";

/// Longest certificate validity a policy may request (100 years).
pub const MAX_CERTIFICATE_VALIDITY_DAYS: i64 = 36_500;

/// The decision a rule produces when it matches a `SigningContext`.
///
/// Example in TOML:
/// ```toml
/// verdict = "allow"
/// verdict = "deny"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleVerdict {
    Allow,
    Deny,
}

/// A single signing rule loaded from TOML.
///
/// `algorithm`, `signer`, and `document` are patterns. `"*"` matches any
/// value, a trailing `*` matches by prefix (`"finance/*"`), and anything else
/// must match exactly (case-sensitive). Omitted patterns default to `"*"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningRule {
    /// Stable identifier used in logs and deny reasons.
    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "wildcard")]
    pub algorithm: String,

    #[serde(default = "wildcard")]
    pub signer: String,

    #[serde(default = "wildcard")]
    pub document: String,

    pub verdict: RuleVerdict,

    /// Surfaced in the `PolicyDenied` error when `verdict = "deny"`.
    pub deny_reason: Option<String>,
}

impl SigningRule {
    /// Return true if every pattern of this rule matches.
    pub fn matches(&self, algorithm: &str, signer: &str, document: &str) -> bool {
        pattern_matches(&self.algorithm, algorithm)
            && pattern_matches(&self.signer, signer)
            && pattern_matches(&self.document, document)
    }
}

fn pattern_matches(pattern: &str, value: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => value.starts_with(prefix),
        None => pattern == value,
    }
}

fn wildcard() -> String {
    "*".to_string()
}

fn default_true() -> bool {
    true
}

fn default_authority() -> String {
    DEFAULT_AUTHORITY_ID.to_string()
}

fn default_issuer() -> String {
    DEFAULT_CERTIFICATE_ISSUER.to_string()
}

/// The `[policy]` section: identity plus record-level settings.
///
/// Example:
/// ```toml
/// [policy]
/// id = "expense-approval"
/// version = "2"
/// default_algorithm = "SHA256withRSA"
/// verify_on_sign = true
/// certificate_validity_days = 365
/// chain_of_trust = ["docseal-root-ca"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySection {
    pub id: String,
    pub version: String,

    #[serde(default)]
    pub default_algorithm: Algorithm,

    #[serde(default)]
    pub verify_on_sign: bool,

    #[serde(default = "default_true")]
    pub issue_timestamp: bool,

    #[serde(default = "default_authority")]
    pub timestamp_authority: String,

    /// Omit to sign without a certificate.
    pub certificate_validity_days: Option<i64>,

    #[serde(default = "default_issuer")]
    pub certificate_issuer: String,

    #[serde(default)]
    pub chain_of_trust: Vec<String>,
}

impl PolicySection {
    pub fn settings(&self) -> PolicySettings {
        PolicySettings {
            descriptor: PolicyDescriptor {
                policy_id: self.id.clone(),
                version: self.version.clone(),
            },
            default_algorithm: self.default_algorithm,
            verify_on_sign: self.verify_on_sign,
            issue_timestamp: self.issue_timestamp,
            timestamp_authority: self.timestamp_authority.clone(),
            certificate_validity_days: self.certificate_validity_days,
            certificate_issuer: self.certificate_issuer.clone(),
            chain_of_trust: self.chain_of_trust.clone(),
        }
    }
}

/// The top-level structure deserialized from a TOML policy file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub policy: PolicySection,

    /// Ordered list of rules. First match wins.
    #[serde(default)]
    pub rules: Vec<SigningRule>,
}
