//! Binding scopes from EQC decisions. Scopes exist only downstream of an
//! ALLOW verdict; any other decision refuses to bind.

use tracing::debug;

use adamant_core::{AdamantError, Timestamp};
use adamant_eqc::Decision;

use crate::scope::Scope;

/// A scope bound from an ALLOW decision, carrying the fingerprint of the
/// context it authorizes.
#[derive(Clone, Debug)]
pub struct BoundScope {
    pub scope: Scope,
    pub context_fingerprint: String,
}

/// Bind a scope to the decision's context fingerprint.
pub fn bind_scope_from_decision(
    decision: &Decision,
    wallet_id: impl Into<String>,
    action: impl Into<String>,
    ttl_seconds: Timestamp,
    now: Timestamp,
) -> Result<BoundScope, AdamantError> {
    if !decision.verdict.is_allow() {
        return Err(AdamantError::EqcBlocked {
            verdict: decision.verdict.clone(),
        });
    }

    let scope = Scope::from_ttl(
        wallet_id,
        action,
        decision.context_fingerprint.clone(),
        ttl_seconds,
        now,
    )?;
    debug!(
        wallet = %scope.wallet_id,
        action = %scope.action,
        expires_at = scope.expires_at,
        "scope bound from decision"
    );
    Ok(BoundScope {
        context_fingerprint: scope.context_fingerprint.clone(),
        scope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use adamant_core::{Reason, ReasonCode, StepUp, Verdict};
    use adamant_eqc::{Decision, DecisionSignals};

    fn decision(verdict: Verdict) -> Decision {
        Decision {
            context_fingerprint: "fp".into(),
            verdict,
            signals: DecisionSignals::default(),
        }
    }

    #[test]
    fn allow_decisions_bind() {
        let d = decision(Verdict::allow(vec![Reason::new(
            ReasonCode::PolicyRuleMatch,
            "ok",
        )]));
        let bound = bind_scope_from_decision(&d, "w1", "send", 60, 1_000).unwrap();
        assert_eq!(bound.scope.context_fingerprint, "fp");
        assert_eq!(bound.scope.expires_at, 1_060);
    }

    #[test]
    fn non_allow_decisions_refuse_to_bind() {
        let d = decision(Verdict::step_up(
            vec![Reason::new(ReasonCode::LargeAmount, "large")],
            StepUp::confirm_intent(),
        ));
        let err = bind_scope_from_decision(&d, "w1", "send", 60, 1_000).unwrap_err();
        assert_eq!(err.kind(), "EQC_BLOCKED");
    }
}
