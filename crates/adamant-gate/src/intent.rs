//! Signing intents: minimal, auditable requests to perform a signing-like
//! action. No secrets live here (no private keys, no seed bytes), so an
//! intent is safe to log or hash for audit purposes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use adamant_core::{AdamantError, AmountMinor, Timestamp};
use adamant_crypto::fingerprint;
use adamant_eqc::{ActionContext, ContextSnapshot, DeviceContext, NetworkContext, UserContext};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SigningIntent {
    pub wallet_id: String,
    pub account_id: String,

    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default = "default_asset")]
    pub asset: String,
    #[serde(default)]
    pub amount: Option<AmountMinor>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub to_address: Option<String>,
    #[serde(default)]
    pub amount_minor: Option<AmountMinor>,

    #[serde(default = "default_device_type")]
    pub device_type: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_network_type")]
    pub network_type: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub extra: BTreeMap<String, Value>,
}

fn default_action() -> String {
    "sign".to_string()
}
fn default_asset() -> String {
    "DGB".to_string()
}
fn default_device_type() -> String {
    "mobile".to_string()
}
fn default_platform() -> String {
    "ios".to_string()
}
fn default_network_type() -> String {
    "unknown".to_string()
}
fn default_user_id() -> String {
    "user".to_string()
}

impl SigningIntent {
    pub fn new(wallet_id: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            account_id: account_id.into(),
            action: default_action(),
            asset: default_asset(),
            amount: None,
            recipient: None,
            to_address: None,
            amount_minor: None,
            device_type: default_device_type(),
            platform: default_platform(),
            network_type: default_network_type(),
            user_id: default_user_id(),
            extra: BTreeMap::new(),
        }
    }

    /// SHA-256 hex digest of the canonical intent. Attached to the context
    /// snapshot so a mutated intent can never reuse a prior authority chain.
    pub fn intent_hash(&self) -> Result<String, AdamantError> {
        fingerprint(self)
    }

    pub fn destination(&self) -> Option<&str> {
        self.recipient
            .as_deref()
            .or(self.to_address.as_deref())
    }

    pub fn effective_amount(&self) -> Option<AmountMinor> {
        self.amount.or(self.amount_minor)
    }
}

/// Build the EQC context snapshot for an intent, stamping the intent hash
/// into `extra`.
pub fn build_context(
    intent: &SigningIntent,
    now: Timestamp,
) -> Result<ContextSnapshot, AdamantError> {
    let action = ActionContext {
        name: intent.action.clone(),
        asset: intent.asset.clone(),
        amount: intent.effective_amount(),
        recipient: intent.destination().map(str::to_string),
    };

    let device = DeviceContext {
        device_id: Some(extra_string(&intent.extra, "device_id").unwrap_or_else(|| "device".into())),
        device_type: intent.device_type.clone(),
        os: intent.platform.clone(),
        trusted: extra_bool(&intent.extra, "device_trusted"),
        first_seen_ts: extra_i64(&intent.extra, "device_first_seen_ts"),
        app_version: extra_string(&intent.extra, "app_version"),
    };

    let network = NetworkContext {
        network: if intent.network_type.is_empty() {
            "mainnet".to_string()
        } else {
            intent.network_type.clone()
        },
        node_type: extra_string(&intent.extra, "node_type"),
        node_trusted: extra_bool(&intent.extra, "node_trusted"),
        entropy_score: extra_f64(&intent.extra, "entropy_score"),
        fee_rate: extra_u64(&intent.extra, "fee_rate"),
        peer_count: extra_u64(&intent.extra, "peer_count").map(|n| n as u32),
    };

    let user = UserContext {
        user_id: Some(intent.user_id.clone()),
        biometric_available: extra_bool(&intent.extra, "biometric_available"),
        pin_set: extra_bool(&intent.extra, "pin_set"),
    };

    let mut snapshot = ContextSnapshot::new(action, device, network, user, now);
    snapshot.extra = intent.extra.clone();
    snapshot
        .extra
        .insert("intent_hash".to_string(), Value::String(intent.intent_hash()?));
    Ok(snapshot)
}

fn extra_string(extra: &BTreeMap<String, Value>, key: &str) -> Option<String> {
    extra
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn extra_bool(extra: &BTreeMap<String, Value>, key: &str) -> bool {
    extra.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn extra_f64(extra: &BTreeMap<String, Value>, key: &str) -> Option<f64> {
    extra.get(key).and_then(Value::as_f64)
}

fn extra_u64(extra: &BTreeMap<String, Value>, key: &str) -> Option<u64> {
    extra.get(key).and_then(Value::as_u64)
}

fn extra_i64(extra: &BTreeMap<String, Value>, key: &str) -> Option<i64> {
    extra.get(key).and_then(Value::as_i64)
}
