//! TOML-driven signing policy implementation.
//!
//! `TomlSigningPolicy` loads a `PolicyConfig` from a TOML string or file and
//! implements the `SigningPolicy` trait from docseal-core.
//!
//! Evaluation algorithm:
//!
//! 1. Iterate rules in declaration order.
//! 2. The first rule whose `algorithm`, `signer`, and `document` patterns
//!    match decides: `allow` → `Allow`, `deny` → `Deny` with its reason.
//! 3. If no rule matched → `Deny` ("denied by default").

use std::path::Path;

use tracing::{debug, warn};

use docseal_contracts::{
    envelope::Algorithm,
    error::{SignatureError, SignatureResult},
    policy::{PolicySettings, PolicyVerdict, SigningContext},
};
use docseal_core::traits::SigningPolicy;

use crate::rule::{PolicyConfig, RuleVerdict, MAX_CERTIFICATE_VALIDITY_DAYS};

/// A `SigningPolicy` implementation that reads rules from a TOML document.
///
/// ```rust,ignore
/// use docseal_policy::TomlSigningPolicy;
///
/// let policy = TomlSigningPolicy::from_file(Path::new("policies/expense.toml"))?;
/// ```
#[derive(Debug)]
pub struct TomlSigningPolicy {
    config: PolicyConfig,
    settings: PolicySettings,
}

impl TomlSigningPolicy {
    /// Parse `s` as TOML and build a `TomlSigningPolicy`.
    ///
    /// Returns `SignatureError::ConfigError` if the TOML is malformed, does
    /// not match `PolicyConfig`, or fails validation.
    pub fn from_toml_str(s: &str) -> SignatureResult<Self> {
        let config: PolicyConfig = toml::from_str(s).map_err(|e| SignatureError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as TOML policy configuration.
    pub fn from_file(path: &Path) -> SignatureResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SignatureError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate an already-deserialized configuration.
    pub fn from_config(config: PolicyConfig) -> SignatureResult<Self> {
        validate(&config)?;
        let settings = config.policy.settings();
        debug!(
            policy_id = %settings.descriptor.policy_id,
            version = %settings.descriptor.version,
            rules = config.rules.len(),
            "signing policy loaded"
        );
        Ok(Self { config, settings })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }
}

fn validate(config: &PolicyConfig) -> SignatureResult<()> {
    if config.policy.id.trim().is_empty() {
        return Err(SignatureError::ConfigError {
            reason: "policy id must not be empty".to_string(),
        });
    }

    if let Some(days) = config.policy.certificate_validity_days {
        if days <= 0 {
            return Err(SignatureError::ConfigError {
                reason: format!("certificate_validity_days must be positive, got {days}"),
            });
        }
        if days > MAX_CERTIFICATE_VALIDITY_DAYS {
            return Err(SignatureError::ConfigError {
                reason: format!(
                    "certificate_validity_days must be at most {MAX_CERTIFICATE_VALIDITY_DAYS}, got {days}"
                ),
            });
        }
    }

    for rule in &config.rules {
        let exact = !rule.algorithm.ends_with('*');
        if exact && Algorithm::parse(&rule.algorithm).is_none() {
            return Err(SignatureError::ConfigError {
                reason: format!("rule '{}' names unknown algorithm '{}'", rule.id, rule.algorithm),
            });
        }
    }

    Ok(())
}

impl SigningPolicy for TomlSigningPolicy {
    /// Evaluate `ctx` against the loaded rule set. First match wins; no
    /// match denies.
    fn evaluate(&self, ctx: &SigningContext) -> SignatureResult<PolicyVerdict> {
        debug!(
            signer = %ctx.signer,
            document = %ctx.document,
            algorithm = %ctx.algorithm,
            "evaluating signing policy"
        );

        for rule in &self.config.rules {
            if !rule.matches(&ctx.algorithm, &ctx.signer, &ctx.document) {
                continue;
            }

            debug!(rule_id = %rule.id, signer = %ctx.signer, "rule matched");

            let verdict = match rule.verdict {
                RuleVerdict::Allow => PolicyVerdict::Allow,
                RuleVerdict::Deny => PolicyVerdict::Deny {
                    reason: rule
                        .deny_reason
                        .clone()
                        .unwrap_or_else(|| format!("denied by rule '{}'", rule.id)),
                },
            };

            return Ok(verdict);
        }

        warn!(
            signer = %ctx.signer,
            document = %ctx.document,
            algorithm = %ctx.algorithm,
            "no signing rule matched; denying by default"
        );

        Ok(PolicyVerdict::Deny {
            reason: format!(
                "denied by default: no signing rule matched signer '{}' using '{}' on document '{}'",
                ctx.signer, ctx.algorithm, ctx.document
            ),
        })
    }

    fn settings(&self) -> &PolicySettings {
        &self.settings
    }
}
