//! Signal classifiers. Pure functions of the context snapshot: same input,
//! same signal bag, no I/O. The classifier seams are traits so hosts can
//! swap in richer device attestation without touching the engine.

use serde::{Deserialize, Serialize};

use adamant_core::{AMOUNT_BAND_HIGH_FLOOR, AMOUNT_BAND_MEDIUM_FLOOR};
use adamant_core::AmountMinor;

use crate::context::ContextSnapshot;

// ── Device signals ───────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DeviceSignals {
    pub device_type: String,
    pub trusted: bool,
    /// Device has a first-seen timestamp, i.e. is known to the wallet.
    pub known_device: bool,
    /// Hardware or air-gapped surface.
    pub hardware_backed: bool,
    pub app_version_present: bool,
}

pub trait DeviceClassifier: Send + Sync {
    fn classify(&self, ctx: &ContextSnapshot) -> DeviceSignals;
}

pub struct DefaultDeviceClassifier;

impl DeviceClassifier for DefaultDeviceClassifier {
    fn classify(&self, ctx: &ContextSnapshot) -> DeviceSignals {
        let device_type = ctx.device.device_type.to_lowercase();
        DeviceSignals {
            hardware_backed: matches!(device_type.as_str(), "hardware" | "airgap"),
            trusted: ctx.device.trusted,
            known_device: ctx.device.first_seen_ts.is_some(),
            app_version_present: ctx.device.app_version.is_some(),
            device_type,
        }
    }
}

// ── Transaction signals ──────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountBand {
    None,
    Low,
    Medium,
    High,
}

impl AmountBand {
    pub fn from_amount(amount: Option<AmountMinor>) -> Self {
        match amount {
            None => AmountBand::None,
            Some(a) if a >= AMOUNT_BAND_HIGH_FLOOR => AmountBand::High,
            Some(a) if a >= AMOUNT_BAND_MEDIUM_FLOOR => AmountBand::Medium,
            Some(_) => AmountBand::Low,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TxSignals {
    pub action: String,
    pub asset: String,
    /// Moves value out of the wallet (send/transfer family).
    pub transfer_like: bool,
    pub has_amount: bool,
    pub amount_band: AmountBand,
    pub has_recipient: bool,
}

pub trait TxClassifier: Send + Sync {
    fn classify(&self, ctx: &ContextSnapshot) -> TxSignals;
}

pub struct DefaultTxClassifier;

impl TxClassifier for DefaultTxClassifier {
    fn classify(&self, ctx: &ContextSnapshot) -> TxSignals {
        let action = ctx.action.name.to_lowercase();
        TxSignals {
            transfer_like: matches!(action.as_str(), "send" | "send_dgb" | "transfer"),
            asset: ctx.action.asset.to_lowercase(),
            has_amount: ctx.action.amount.is_some(),
            amount_band: AmountBand::from_amount(ctx.action.amount),
            has_recipient: ctx.action.recipient.is_some(),
            action,
        }
    }
}
