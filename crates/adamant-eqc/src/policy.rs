//! Base policy: deterministic rules reducing context + signals to a
//! verdict. The base policy may return any verdict kind; packs can only
//! tighten whatever it returns.

use serde_json::json;

use adamant_core::{Reason, ReasonCode, StepUp, Verdict, LOW_ENTROPY_FLOOR};

use crate::classifiers::{DeviceSignals, TxSignals};
use crate::context::ContextSnapshot;

pub trait Policy: Send + Sync {
    fn evaluate(
        &self,
        ctx: &ContextSnapshot,
        device_signals: &DeviceSignals,
        tx_signals: &TxSignals,
    ) -> Verdict;
}

/// Shipping base policy.
pub struct DefaultPolicy;

impl Policy for DefaultPolicy {
    fn evaluate(
        &self,
        ctx: &ContextSnapshot,
        device_signals: &DeviceSignals,
        tx_signals: &TxSignals,
    ) -> Verdict {
        // Value leaving the wallet from an untrusted surface needs the user.
        if tx_signals.transfer_like && tx_signals.has_amount && !device_signals.trusted {
            return Verdict::step_up(
                vec![Reason::new(
                    ReasonCode::PolicyRuleMatch,
                    "Transfer requested from an untrusted device.",
                )
                .with_detail("device_type", json!(device_signals.device_type))],
                StepUp::confirm_intent()
                    .with_message("Confirm this transfer on a trusted device."),
            );
        }

        if let Some(score) = ctx.network.entropy_score {
            if score < LOW_ENTROPY_FLOOR {
                return Verdict::step_up(
                    vec![Reason::new(
                        ReasonCode::PolicyRuleMatch,
                        "Network entropy below the operating floor.",
                    )
                    .with_detail("entropy_score", json!(score))
                    .with_detail("floor", json!(LOW_ENTROPY_FLOOR))],
                    StepUp::confirm_intent(),
                );
            }
        }

        Verdict::allow(vec![Reason::new(
            ReasonCode::PolicyRuleMatch,
            "Baseline policy checks passed.",
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adamant_core::VerdictKind;
    use crate::classifiers::{
        DefaultDeviceClassifier, DefaultTxClassifier, DeviceClassifier, TxClassifier,
    };
    use crate::context::{ActionContext, ContextSnapshot, DeviceContext, NetworkContext, UserContext};

    fn ctx(trusted: bool, entropy: Option<f64>) -> ContextSnapshot {
        ContextSnapshot::new(
            ActionContext {
                name: "send".into(),
                asset: "DGB".into(),
                amount: Some(1_000),
                recipient: Some("DGB1-test".into()),
            },
            DeviceContext {
                trusted,
                ..DeviceContext::default()
            },
            NetworkContext {
                entropy_score: entropy,
                node_trusted: true,
                ..NetworkContext::default()
            },
            UserContext::default(),
            1_766_877_694,
        )
    }

    fn evaluate(c: &ContextSnapshot) -> Verdict {
        let device = DefaultDeviceClassifier.classify(c);
        let tx = DefaultTxClassifier.classify(c);
        DefaultPolicy.evaluate(c, &device, &tx)
    }

    #[test]
    fn trusted_device_send_is_allowed() {
        let v = evaluate(&ctx(true, Some(0.9)));
        assert_eq!(v.kind, VerdictKind::Allow);
        assert!(!v.reasons.is_empty());
    }

    #[test]
    fn untrusted_device_send_requires_step_up() {
        let v = evaluate(&ctx(false, Some(0.9)));
        assert_eq!(v.kind, VerdictKind::StepUp);
        let step = v.step_up.unwrap();
        assert!(step.requirements.contains(&"confirm_user_intent".to_string()));
    }

    #[test]
    fn low_entropy_requires_step_up() {
        let v = evaluate(&ctx(true, Some(0.1)));
        assert_eq!(v.kind, VerdictKind::StepUp);
    }

    #[test]
    fn missing_entropy_score_is_not_penalized() {
        let v = evaluate(&ctx(true, None));
        assert_eq!(v.kind, VerdictKind::Allow);
    }
}
