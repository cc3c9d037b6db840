//! Runtime capabilities: unforgeable single-use authority tokens.
//!
//! A capability is bound to a specific scope fingerprint so it cannot be
//! redeemed against any other scope (anti-confused-deputy), and may carry
//! its own TTL to avoid long-lived authority. Capabilities never leave the
//! process; the token zeroizes on drop and redacts in Debug output.

use std::fmt;

use zeroize::Zeroize;

use adamant_core::{AdamantError, Timestamp};
use adamant_crypto::capability_token;

// ── CapabilityToken ──────────────────────────────────────────────────────────

/// High-entropy opaque token. 256 bits from the OS CSPRNG.
#[derive(Clone, PartialEq, Eq)]
pub struct CapabilityToken(String);

impl CapabilityToken {
    pub fn mint() -> Self {
        Self(capability_token())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for CapabilityToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for CapabilityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilityToken({}b)", self.0.len() / 2)
    }
}

// ── Capability ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Capability {
    pub token: CapabilityToken,
    pub scope_fingerprint: String,
    pub issued_at: Timestamp,
    /// Absent TTL means the capability never expires at this layer; scope
    /// expiry still applies at execution.
    pub ttl_seconds: Option<Timestamp>,
}

impl Capability {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        match self.ttl_seconds {
            Some(ttl) => now > self.issued_at + ttl,
            None => false,
        }
    }

    pub fn assert_valid(&self, now: Timestamp) -> Result<(), AdamantError> {
        if self.token.is_empty() {
            return Err(AdamantError::CapabilityInvalid("missing token".into()));
        }
        if self.scope_fingerprint.is_empty() {
            return Err(AdamantError::CapabilityInvalid(
                "missing scope fingerprint".into(),
            ));
        }
        if self.is_expired(now) {
            return Err(AdamantError::CapabilityInvalid("expired".into()));
        }
        Ok(())
    }
}

/// Mint a new capability bound to a scope fingerprint.
pub fn issue_capability(
    scope_fingerprint: impl Into<String>,
    ttl_seconds: Option<Timestamp>,
    now: Timestamp,
) -> Capability {
    Capability {
        token: CapabilityToken::mint(),
        scope_fingerprint: scope_fingerprint.into(),
        issued_at: now,
        ttl_seconds,
    }
}
