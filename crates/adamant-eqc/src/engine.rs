//! EQC engine: the decision crown.
//!
//! Order of operations is fixed and not configurable: hard invariants,
//! then classifiers, then base policy, then policy packs, then a
//! deterministic merge under `DENY > STEP_UP > ALLOW`. Hard invariants
//! never raise; their outcome IS the verdict.

use serde_json::json;
use tracing::info;

use adamant_core::{
    AdamantError, Reason, ReasonCode, StepUp, Verdict, VerdictKind, POLICY_PACKS_ENV,
};

use crate::classifiers::{
    DefaultDeviceClassifier, DefaultTxClassifier, DeviceClassifier, TxClassifier,
};
use crate::context::ContextSnapshot;
use crate::decision::{Decision, DecisionSignals, InvariantSignal};
use crate::policy::{DefaultPolicy, Policy};
use crate::registry::PolicyPackRegistry;

pub struct EqcEngine {
    policy: Box<dyn Policy>,
    device_classifier: Box<dyn DeviceClassifier>,
    tx_classifier: Box<dyn TxClassifier>,
    registry: PolicyPackRegistry,
    enabled_packs: Vec<String>,
}

impl Default for EqcEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EqcEngine {
    /// Engine with the shipping policy, classifiers, and registry. Enabled
    /// packs are read from `EQC_POLICY_PACKS` (comma-separated references).
    pub fn new() -> Self {
        Self::with_components(
            Box::new(DefaultPolicy),
            Box::new(DefaultDeviceClassifier),
            Box::new(DefaultTxClassifier),
            PolicyPackRegistry::default(),
            None,
        )
    }

    /// Engine with explicit components. `enabled_packs = None` falls back
    /// to the environment setting.
    pub fn with_components(
        policy: Box<dyn Policy>,
        device_classifier: Box<dyn DeviceClassifier>,
        tx_classifier: Box<dyn TxClassifier>,
        registry: PolicyPackRegistry,
        enabled_packs: Option<Vec<String>>,
    ) -> Self {
        Self {
            policy,
            device_classifier,
            tx_classifier,
            registry,
            enabled_packs: enabled_packs.unwrap_or_else(packs_from_env),
        }
    }

    /// Enable a pack reference. Idempotent; preserves enable order.
    pub fn enable_policy_pack(&mut self, reference: &str) {
        if !self.enabled_packs.iter().any(|r| r == reference) {
            self.enabled_packs.push(reference.to_string());
        }
    }

    /// Disable a pack reference. Idempotent.
    pub fn disable_policy_pack(&mut self, reference: &str) {
        self.enabled_packs.retain(|r| r != reference);
    }

    pub fn enabled_packs(&self) -> &[String] {
        &self.enabled_packs
    }

    pub fn registry_mut(&mut self) -> &mut PolicyPackRegistry {
        &mut self.registry
    }

    /// Reduce a context snapshot to a decision.
    pub fn decide(&self, ctx: &ContextSnapshot) -> Result<Decision, AdamantError> {
        let context_fingerprint = ctx.fingerprint()?;

        // ── Hard invariants (hold even if every policy changes) ──────────────
        let device_type = ctx.device.device_type.to_lowercase();
        let action_name = ctx.action.name.to_lowercase();
        let asset_name = ctx.action.asset.to_lowercase();

        if device_type == "browser" || device_type == "extension" {
            let code = if device_type == "browser" {
                ReasonCode::BrowserContextBlocked
            } else {
                ReasonCode::ExtensionContextBlocked
            };
            let verdict = Verdict::deny(vec![Reason::new(
                code,
                format!("Execution denied: {device_type} context is not permitted."),
            )
            .with_detail("device_type", json!(device_type.clone()))]);
            info!(verdict = %verdict.kind, invariant = "HOSTILE_RUNTIME", "eqc decision");
            return Ok(Decision {
                context_fingerprint,
                verdict,
                signals: DecisionSignals {
                    invariant: Some(InvariantSignal::HostileRuntime { device_type }),
                    ..DecisionSignals::default()
                },
            });
        }

        if matches!(action_name.as_str(), "mint" | "redeem")
            && matches!(asset_name.as_str(), "digidollar" | "dd")
        {
            let verdict = Verdict::step_up(
                vec![Reason::new(
                    ReasonCode::MintRedeemRequiresStepUp,
                    "Step-up required: DigiDollar mint/redeem requires additional confirmation.",
                )
                .with_detail("action", json!(action_name.clone()))
                .with_detail("asset", json!(asset_name.clone()))],
                StepUp::confirm_intent(),
            );
            info!(verdict = %verdict.kind, invariant = "DD_STEP_UP", "eqc decision");
            return Ok(Decision {
                context_fingerprint,
                verdict,
                signals: DecisionSignals {
                    invariant: Some(InvariantSignal::DigiDollarStepUp {
                        action: action_name,
                        asset: asset_name,
                    }),
                    ..DecisionSignals::default()
                },
            });
        }

        // ── Classify ─────────────────────────────────────────────────────────
        let device_signals = self.device_classifier.classify(ctx);
        let tx_signals = self.tx_classifier.classify(ctx);

        // ── Base policy ──────────────────────────────────────────────────────
        let base = self.policy.evaluate(ctx, &device_signals, &tx_signals);

        // ── Policy packs (opt-in, tighten-only) ──────────────────────────────
        let pack_verdicts =
            self.registry
                .evaluate(ctx, &self.enabled_packs, &device_signals, &tx_signals)?;
        let pack_kinds: Vec<VerdictKind> = pack_verdicts.iter().map(|v| v.kind).collect();

        // ── Merge ────────────────────────────────────────────────────────────
        let verdict = merge_verdicts(base, pack_verdicts);
        info!(
            verdict = %verdict.kind,
            fingerprint = %context_fingerprint,
            packs = pack_kinds.len(),
            "eqc decision"
        );

        Ok(Decision {
            context_fingerprint,
            verdict,
            signals: DecisionSignals {
                invariant: None,
                device: Some(device_signals),
                tx: Some(tx_signals),
                policy_packs: pack_kinds,
            },
        })
    }
}

fn packs_from_env() -> Vec<String> {
    std::env::var(POLICY_PACKS_ENV)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Deterministic merge: strongest kind wins, reasons of the winning kind
/// concatenate in encounter order (base first, then packs as evaluated).
/// A winning STEP_UP carries the first step-up payload among the winners,
/// falling back to the minimal confirmation requirement.
fn merge_verdicts(base: Verdict, pack_verdicts: Vec<Verdict>) -> Verdict {
    let mut all = Vec::with_capacity(1 + pack_verdicts.len());
    all.push(base);
    all.extend(pack_verdicts);

    let winner = all
        .iter()
        .map(|v| v.kind)
        .fold(VerdictKind::Allow, VerdictKind::max);

    let mut reasons = Vec::new();
    let mut step_up = None;
    for verdict in all {
        if verdict.kind != winner {
            continue;
        }
        reasons.extend(verdict.reasons);
        if step_up.is_none() {
            step_up = verdict.step_up;
        }
    }

    match winner {
        VerdictKind::Allow => Verdict::allow(reasons),
        VerdictKind::Deny => Verdict::deny(reasons),
        VerdictKind::StepUp => {
            Verdict::step_up(reasons, step_up.unwrap_or_else(StepUp::confirm_intent))
        }
    }
}
