use serde::{Deserialize, Serialize};

use adamant_core::{Verdict, VerdictKind};

use crate::classifiers::{DeviceSignals, TxSignals};

/// Which hard invariant short-circuited the decision, when one did.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvariantSignal {
    /// Browser/extension surfaces are structurally hostile runtimes.
    HostileRuntime { device_type: String },
    /// DigiDollar mint/redeem always needs the user in the loop.
    #[serde(rename = "DD_STEP_UP")]
    DigiDollarStepUp { action: String, asset: String },
}

/// Everything the engine observed on the way to the verdict.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct DecisionSignals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invariant: Option<InvariantSignal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceSignals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<TxSignals>,
    /// Verdict kinds contributed by enabled packs, in evaluation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_packs: Vec<VerdictKind>,
}

/// Output of one EQC evaluation: the verdict, the fingerprint of the
/// context it applies to, and the signals that led there.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Decision {
    pub context_fingerprint: String,
    pub verdict: Verdict,
    pub signals: DecisionSignals,
}
