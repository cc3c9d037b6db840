//! WSQK sessions: the holder of one-time nonces.
//!
//! The used-key set is the only shared mutable state in the core. Consume
//! is linearizable: of two concurrent calls presenting the same
//! (scope_fingerprint, nonce), exactly one succeeds.

use std::collections::HashSet;
use std::sync::Mutex;

use adamant_core::{AdamantError, Timestamp, DEFAULT_SESSION_TTL_SECS};
use adamant_crypto::{nonce as fresh_nonce, session_id};

pub struct Session {
    pub id: String,
    pub wallet_id: Option<String>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    used_keys: Mutex<HashSet<String>>,
}

impl Session {
    pub fn new(
        wallet_id: Option<String>,
        ttl_seconds: Timestamp,
        now: Timestamp,
    ) -> Result<Self, AdamantError> {
        if ttl_seconds <= 0 {
            return Err(AdamantError::MalformedInput(format!(
                "session ttl_seconds must be positive; got {ttl_seconds}"
            )));
        }
        Ok(Self {
            id: session_id(),
            wallet_id,
            created_at: now,
            expires_at: now + ttl_seconds,
            used_keys: Mutex::new(HashSet::new()),
        })
    }

    /// Session with the default TTL.
    pub fn open(wallet_id: Option<String>, now: Timestamp) -> Self {
        Self {
            id: session_id(),
            wallet_id,
            created_at: now,
            expires_at: now + DEFAULT_SESSION_TTL_SECS,
            used_keys: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        self.created_at <= now && now <= self.expires_at
    }

    pub fn assert_active(&self, now: Timestamp) -> Result<(), AdamantError> {
        if self.is_active(now) {
            Ok(())
        } else {
            Err(AdamantError::SessionExpired)
        }
    }

    /// Issue a fresh one-time nonce. The nonce itself is unbound; binding
    /// to a scope is enforced when it is consumed.
    pub fn issue_nonce(&self) -> String {
        fresh_nonce()
    }

    /// Mark a nonce as used under a scope fingerprint. Re-use of the same
    /// (scope_fingerprint, nonce) pair fails with `NONCE_REPLAY`.
    pub fn consume_nonce(
        &self,
        nonce: &str,
        scope_fingerprint: Option<&str>,
        now: Timestamp,
    ) -> Result<(), AdamantError> {
        self.assert_active(now)?;

        let key = match scope_fingerprint {
            Some(fp) => format!("{fp}:{nonce}"),
            None => nonce.to_string(),
        };

        let mut used = self
            .used_keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !used.insert(key) {
            return Err(AdamantError::NonceReplay);
        }
        Ok(())
    }
}
