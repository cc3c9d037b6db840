//! Context snapshot: the immutable input to an EQC decision.
//!
//! Decisions are based only on data present in this snapshot. No hidden
//! globals, no side effects. The snapshot's fingerprint anchors audit logs,
//! replay protection, and WSQK scope binding downstream of ALLOW.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use adamant_core::{AdamantError, AmountMinor, Timestamp};
use adamant_crypto::fingerprint;

// ── Sub-contexts ─────────────────────────────────────────────────────────────

/// The requested action itself.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ActionContext {
    /// Action name: send, mint, redeem, sign, vote.
    pub name: String,
    /// Asset symbol: DGB, DigiAsset, DigiDollar.
    pub asset: String,
    #[serde(default)]
    pub amount: Option<AmountMinor>,
    #[serde(default)]
    pub recipient: Option<String>,
}

impl ActionContext {
    pub fn new(name: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset: asset.into(),
            amount: None,
            recipient: None,
        }
    }
}

/// Where the request originates.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DeviceContext {
    #[serde(default)]
    pub device_id: Option<String>,
    /// mobile, hardware, airgap, browser, extension.
    pub device_type: String,
    pub os: String,
    pub trusted: bool,
    #[serde(default)]
    pub first_seen_ts: Option<Timestamp>,
    #[serde(default)]
    pub app_version: Option<String>,
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self {
            device_id: None,
            device_type: "mobile".to_string(),
            os: "ios".to_string(),
            trusted: false,
            first_seen_ts: None,
            app_version: None,
        }
    }
}

/// Network conditions at request time.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct NetworkContext {
    /// mainnet or testnet.
    pub network: String,
    /// local, digimobile, remote.
    #[serde(default)]
    pub node_type: Option<String>,
    pub node_trusted: bool,
    #[serde(default)]
    pub entropy_score: Option<f64>,
    #[serde(default)]
    pub fee_rate: Option<u64>,
    #[serde(default)]
    pub peer_count: Option<u32>,
}

impl Default for NetworkContext {
    fn default() -> Self {
        Self {
            network: "mainnet".to_string(),
            node_type: None,
            node_trusted: false,
            entropy_score: None,
            fee_rate: None,
            peer_count: None,
        }
    }
}

/// User posture on this device.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default)]
    pub user_id: Option<String>,
    pub biometric_available: bool,
    pub pin_set: bool,
}

// ── ContextSnapshot ──────────────────────────────────────────────────────────

/// Canonical context passed into EQC. Hashed and later bound to WSQK
/// scopes, so any field change yields a different authority chain.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub action: ActionContext,
    pub device: DeviceContext,
    pub network: NetworkContext,
    pub user: UserContext,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ContextSnapshot {
    pub fn new(
        action: ActionContext,
        device: DeviceContext,
        network: NetworkContext,
        user: UserContext,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            action,
            device,
            network,
            user,
            timestamp,
            extra: BTreeMap::new(),
        }
    }

    /// SHA-256 hex digest of the snapshot's canonical JSON. Total for any
    /// well-formed snapshot; identical semantic content yields an identical
    /// fingerprint.
    pub fn fingerprint(&self) -> Result<String, AdamantError> {
        fingerprint(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ContextSnapshot {
        ContextSnapshot::new(
            ActionContext {
                name: "send".into(),
                asset: "DGB".into(),
                amount: Some(1_000),
                recipient: Some("DGB1-test".into()),
            },
            DeviceContext {
                trusted: true,
                app_version: Some("0.1.0".into()),
                ..DeviceContext::default()
            },
            NetworkContext {
                node_type: Some("local".into()),
                node_trusted: true,
                entropy_score: Some(0.9),
                peer_count: Some(8),
                ..NetworkContext::default()
            },
            UserContext {
                user_id: Some("user-1".into()),
                biometric_available: true,
                pin_set: true,
            },
            1_766_877_694,
        )
    }

    #[test]
    fn identical_content_yields_identical_fingerprints() {
        assert_eq!(
            snapshot().fingerprint().unwrap(),
            snapshot().fingerprint().unwrap()
        );
    }

    #[test]
    fn any_field_change_changes_the_fingerprint() {
        let base = snapshot().fingerprint().unwrap();

        let mut bumped = snapshot();
        bumped.action.amount = Some(1_001);
        assert_ne!(base, bumped.fingerprint().unwrap());

        let mut extra = snapshot();
        extra
            .extra
            .insert("k".into(), serde_json::Value::Bool(true));
        assert_ne!(base, extra.fingerprint().unwrap());
    }

    #[test]
    fn empty_extra_serializes_as_an_empty_object() {
        let json = adamant_crypto::canonical_string(&snapshot()).unwrap();
        assert!(json.contains(r#""extra":{}"#));
    }
}
