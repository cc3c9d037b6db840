//! Policy packs: additive evaluators that may only tighten the base
//! verdict. A pack returning `None` has no opinion and is skipped; merging
//! in the engine guarantees a pack ALLOW can never downgrade the base.

use serde_json::json;

use adamant_core::{
    AmountMinor, Reason, ReasonCode, StepUp, Verdict, HIGH_VALUE_THRESHOLD_MINOR,
};

use crate::classifiers::{DeviceSignals, TxSignals};
use crate::context::ContextSnapshot;

pub trait PolicyPack: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        ctx: &ContextSnapshot,
        device_signals: &DeviceSignals,
        tx_signals: &TxSignals,
    ) -> Option<Verdict>;
}

// ── HighValueStepUpPack ──────────────────────────────────────────────────────

/// Require STEP_UP for high-value sends. Deployments enforce stricter
/// confirmation for large transfers without touching the base policy.
pub struct HighValueStepUpPack {
    threshold: AmountMinor,
}

impl HighValueStepUpPack {
    pub fn new(threshold: AmountMinor) -> Self {
        Self { threshold }
    }
}

impl Default for HighValueStepUpPack {
    fn default() -> Self {
        Self::new(HIGH_VALUE_THRESHOLD_MINOR)
    }
}

impl PolicyPack for HighValueStepUpPack {
    fn name(&self) -> &str {
        "HIGH_VALUE_STEP_UP"
    }

    fn evaluate(
        &self,
        ctx: &ContextSnapshot,
        _device_signals: &DeviceSignals,
        tx_signals: &TxSignals,
    ) -> Option<Verdict> {
        if tx_signals.action != "send" {
            return None;
        }
        let amount = ctx.action.amount?;
        if amount < self.threshold {
            return None;
        }

        let step = StepUp::confirm_intent().with_message(format!(
            "High-value send requires confirmation (>= {}).",
            self.threshold
        ));
        let reason = Reason::new(
            ReasonCode::LargeAmount,
            format!(
                "High-value transfer detected (amount={amount} >= threshold={}).",
                self.threshold
            ),
        )
        .with_detail("threshold", json!(self.threshold))
        .with_detail("amount", json!(amount));

        Some(Verdict::step_up(vec![reason], step))
    }
}
