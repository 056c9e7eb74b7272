//! Simplified internal timestamp authority.
//!
//! A token is base64 over a small JSON payload:
//!
//! ```text
//! { "timestamp": <RFC 3339, millisecond precision>,
//!   "hash":      hex SHA-256(data ++ timestamp),
//!   "authorityId": <issuer name> }
//! ```
//!
//! Verification recomputes the hash from the caller's data and the embedded
//! timestamp. That proves the (data, timestamp) pair has not been altered
//! since issuance *provided the token itself is trusted*. The token is not
//! signed and the authority is not a third party; this is a stand-in, not
//! RFC 3161.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use docseal_contracts::envelope::TimestampToken;

use crate::canonical::hash_bytes;

/// Authority id used when none is configured.
pub const DEFAULT_AUTHORITY_ID: &str = "docseal-internal-tsa";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
    timestamp: String,
    hash: String,
    authority_id: String,
}

/// Issues and checks timestamp tokens under one authority id.
#[derive(Debug, Clone)]
pub struct TimestampAuthority {
    authority_id: String,
}

impl TimestampAuthority {
    pub fn new(authority_id: impl Into<String>) -> Self {
        Self {
            authority_id: authority_id.into(),
        }
    }

    pub fn authority_id(&self) -> &str {
        &self.authority_id
    }

    /// Issue a token binding `data` to the current time.
    pub fn issue(&self, data: &str) -> TimestampToken {
        self.issue_at(data, Utc::now())
    }

    /// Issue a token binding `data` to `at`.
    pub fn issue_at(&self, data: &str, at: DateTime<Utc>) -> TimestampToken {
        let timestamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let payload = TokenPayload {
            hash: attestation_hash(data, &timestamp),
            timestamp,
            authority_id: self.authority_id.clone(),
        };

        // Serializing a struct of three strings cannot fail.
        let json = serde_json::to_vec(&payload).unwrap_or_default();

        TimestampToken {
            token: STANDARD.encode(json),
            // Reparse so the surfaced value matches the embedded precision.
            timestamp: DateTime::parse_from_rfc3339(&payload.timestamp)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or(at),
            authority_id: payload.authority_id,
        }
    }

    /// Check `token` against `data`.
    ///
    /// Any decoding problem counts as a failed check; this never errors.
    pub fn verify(&self, token: &str, data: &str) -> bool {
        verify_timestamp(token, data)
    }
}

impl Default for TimestampAuthority {
    fn default() -> Self {
        Self::new(DEFAULT_AUTHORITY_ID)
    }
}

/// Issue a token for `data` under the default authority.
pub fn generate_timestamp(data: &str) -> TimestampToken {
    TimestampAuthority::default().issue(data)
}

/// Recompute the embedded hash from `data` and the embedded timestamp.
pub fn verify_timestamp(token: &str, data: &str) -> bool {
    let Ok(bytes) = STANDARD.decode(token) else {
        debug!("timestamp token is not valid base64");
        return false;
    };
    let Ok(payload) = serde_json::from_slice::<TokenPayload>(&bytes) else {
        debug!("timestamp token payload is not valid JSON");
        return false;
    };

    let expected = attestation_hash(data, &payload.timestamp);
    let matches = expected == payload.hash;
    if !matches {
        debug!(authority_id = %payload.authority_id, "timestamp token hash mismatch");
    }
    matches
}

fn attestation_hash(data: &str, timestamp: &str) -> String {
    let mut input = String::with_capacity(data.len() + timestamp.len());
    input.push_str(data);
    input.push_str(timestamp);
    hash_bytes(input.as_bytes())
}
