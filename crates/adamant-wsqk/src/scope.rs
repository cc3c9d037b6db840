//! WSQK scopes: time-bounded authority records.
//!
//! A scope binds authority to (wallet_id, action, context_fingerprint) for
//! a wall-clock window. Its own fingerprint is what capabilities and nonce
//! keys attach to, so replay across even slightly different conditions
//! lands on a different scope and fails structurally.

use serde::{Deserialize, Serialize};

use adamant_core::{AdamantError, Timestamp};
use adamant_crypto::fingerprint;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Scope {
    pub wallet_id: String,
    pub action: String,
    pub context_fingerprint: String,
    pub not_before: Timestamp,
    pub expires_at: Timestamp,
}

impl Scope {
    /// Construct a scope valid for `[now, now + ttl_seconds]`.
    pub fn from_ttl(
        wallet_id: impl Into<String>,
        action: impl Into<String>,
        context_fingerprint: impl Into<String>,
        ttl_seconds: Timestamp,
        now: Timestamp,
    ) -> Result<Self, AdamantError> {
        if ttl_seconds <= 0 {
            return Err(AdamantError::MalformedInput(format!(
                "scope ttl_seconds must be positive; got {ttl_seconds}"
            )));
        }
        Ok(Self {
            wallet_id: wallet_id.into(),
            action: action.into(),
            context_fingerprint: context_fingerprint.into(),
            not_before: now,
            expires_at: now + ttl_seconds,
        })
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        self.not_before <= now && now <= self.expires_at
    }

    pub fn assert_active(&self, now: Timestamp) -> Result<(), AdamantError> {
        if self.is_active(now) {
            Ok(())
        } else {
            Err(AdamantError::ScopeNotActive)
        }
    }

    pub fn assert_wallet(&self, wallet_id: &str) -> Result<(), AdamantError> {
        if wallet_id == self.wallet_id {
            Ok(())
        } else {
            Err(AdamantError::ScopeMismatch { field: "wallet_id" })
        }
    }

    /// Action comparison is case-insensitive; "Send" and "send" are the
    /// same authority.
    pub fn assert_action(&self, action: &str) -> Result<(), AdamantError> {
        if action.eq_ignore_ascii_case(&self.action) {
            Ok(())
        } else {
            Err(AdamantError::ScopeMismatch { field: "action" })
        }
    }

    pub fn assert_context(&self, context_fingerprint: &str) -> Result<(), AdamantError> {
        if context_fingerprint == self.context_fingerprint {
            Ok(())
        } else {
            Err(AdamantError::ScopeMismatch {
                field: "context_fingerprint",
            })
        }
    }

    /// SHA-256 hex digest over the scope's five fields in canonical form.
    /// Nonce keys and capabilities bind to this value.
    pub fn fingerprint(&self) -> Result<String, AdamantError> {
        fingerprint(self)
    }
}
