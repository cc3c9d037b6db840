use thiserror::Error;

use crate::verdict::{Verdict, VerdictKind};

/// Workspace-wide error type. Each variant corresponds to one stable error
/// kind; the signing gate surfaces these directly to callers, and the CLI
/// maps them to exit codes via [`AdamantError::exit_code`].
#[derive(Debug, Error)]
pub enum AdamantError {
    // ── Gate / input errors ──────────────────────────────────────────────────
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("account {wallet_id}/{account_id} is watch-only; signing forbidden")]
    WatchOnlyForbidden {
        wallet_id: String,
        account_id: String,
    },

    #[error("EQC blocked execution: verdict {}", .verdict.kind)]
    EqcBlocked { verdict: Verdict },

    #[error("Shield blocked execution: {reason}")]
    ShieldBlocked { reason: String },

    // ── Authority token errors ───────────────────────────────────────────────
    #[error("scope is not active (expired or not yet valid)")]
    ScopeNotActive,

    #[error("scope {field} mismatch")]
    ScopeMismatch { field: &'static str },

    #[error("capability invalid: {0}")]
    CapabilityInvalid(String),

    // ── Session errors ───────────────────────────────────────────────────────
    #[error("session is not active (expired or not yet valid)")]
    SessionExpired,

    #[error("nonce replay detected (nonce already used)")]
    NonceReplay,

    // ── Registry errors ──────────────────────────────────────────────────────
    #[error("policy pack resolution failed: {0}")]
    PackResolutionFailed(String),

    // ── Serialization ────────────────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AdamantError {
    /// Stable machine-readable tag for this error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AdamantError::MalformedInput(_) => "MALFORMED_INPUT",
            AdamantError::WatchOnlyForbidden { .. } => "WATCH_ONLY_FORBIDDEN",
            AdamantError::EqcBlocked { .. } => "EQC_BLOCKED",
            AdamantError::ShieldBlocked { .. } => "SHIELD_BLOCKED",
            AdamantError::ScopeNotActive => "SCOPE_NOT_ACTIVE",
            AdamantError::ScopeMismatch { .. } => "SCOPE_MISMATCH",
            AdamantError::CapabilityInvalid(_) => "CAPABILITY_INVALID",
            AdamantError::SessionExpired => "SESSION_EXPIRED",
            AdamantError::NonceReplay => "NONCE_REPLAY",
            AdamantError::PackResolutionFailed(_) => "PACK_RESOLUTION_FAILED",
            AdamantError::Serialization(_) => "MALFORMED_INPUT",
        }
    }

    /// CLI exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            AdamantError::EqcBlocked { verdict } => match verdict.kind {
                VerdictKind::StepUp => 11,
                _ => 10,
            },
            AdamantError::ShieldBlocked { .. } => 12,
            AdamantError::WatchOnlyForbidden { .. } => 13,
            AdamantError::ScopeNotActive
            | AdamantError::ScopeMismatch { .. }
            | AdamantError::CapabilityInvalid(_)
            | AdamantError::SessionExpired => 14,
            AdamantError::NonceReplay => 15,
            AdamantError::MalformedInput(_)
            | AdamantError::PackResolutionFailed(_)
            | AdamantError::Serialization(_) => 1,
        }
    }
}

impl From<serde_json::Error> for AdamantError {
    fn from(e: serde_json::Error) -> Self {
        AdamantError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::{Reason, ReasonCode, StepUp};

    #[test]
    fn exit_codes_follow_the_gate_table() {
        let deny = AdamantError::EqcBlocked {
            verdict: Verdict::deny(vec![Reason::new(
                ReasonCode::BrowserContextBlocked,
                "browser",
            )]),
        };
        assert_eq!(deny.exit_code(), 10);

        let step = AdamantError::EqcBlocked {
            verdict: Verdict::step_up(
                vec![Reason::new(ReasonCode::LargeAmount, "large")],
                StepUp::confirm_intent(),
            ),
        };
        assert_eq!(step.exit_code(), 11);

        assert_eq!(
            AdamantError::ShieldBlocked {
                reason: "risk".into()
            }
            .exit_code(),
            12
        );
        assert_eq!(
            AdamantError::WatchOnlyForbidden {
                wallet_id: "w1".into(),
                account_id: "a1".into()
            }
            .exit_code(),
            13
        );
        assert_eq!(AdamantError::ScopeNotActive.exit_code(), 14);
        assert_eq!(AdamantError::NonceReplay.exit_code(), 15);
        assert_eq!(
            AdamantError::MalformedInput("bad".into()).exit_code(),
            1
        );
    }

    #[test]
    fn kinds_are_stable_tags() {
        assert_eq!(AdamantError::NonceReplay.kind(), "NONCE_REPLAY");
        assert_eq!(AdamantError::SessionExpired.kind(), "SESSION_EXPIRED");
        assert_eq!(
            AdamantError::ScopeMismatch { field: "wallet_id" }.kind(),
            "SCOPE_MISMATCH"
        );
    }
}
