//! Verdict model: the three-way outcome of an EQC decision.
//!
//! A verdict is ALLOW, STEP_UP, or DENY together with at least one
//! structured reason. STEP_UP verdicts carry their requirements at
//! construction time; the payload cannot be attached after the fact.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::STEP_UP_CONFIRM_INTENT;

// ── VerdictKind ──────────────────────────────────────────────────────────────

/// Decision outcome. Declaration order defines the tightening order:
/// `Allow < StepUp < Deny`, so `max` over kinds is "strongest wins".
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictKind {
    Allow,
    StepUp,
    Deny,
}

impl fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            VerdictKind::Allow => "ALLOW",
            VerdictKind::StepUp => "STEP_UP",
            VerdictKind::Deny => "DENY",
        };
        write!(f, "{tag}")
    }
}

// ── Reason ───────────────────────────────────────────────────────────────────

/// Stable machine-readable reason codes attached to verdicts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    BrowserContextBlocked,
    ExtensionContextBlocked,
    MintRedeemRequiresStepUp,
    LargeAmount,
    PolicyRuleMatch,
    EngineInvariant,
}

/// One structured reason for a verdict.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Reason {
    pub code: ReasonCode,
    pub message: String,
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl Reason {
    pub fn new(code: ReasonCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

// ── StepUp ───────────────────────────────────────────────────────────────────

/// Payload of a STEP_UP verdict: the ordered requirements the user or
/// device must satisfy before the action may be retried.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct StepUp {
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StepUp {
    pub fn new(requirements: Vec<String>) -> Self {
        Self {
            requirements,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The minimal confirmation requirement used when no policy supplies
    /// a more specific payload.
    pub fn confirm_intent() -> Self {
        Self::new(vec![STEP_UP_CONFIRM_INTENT.to_string()])
    }
}

// ── Verdict ──────────────────────────────────────────────────────────────────

/// An EQC verdict. Constructed only through [`Verdict::allow`],
/// [`Verdict::step_up`], and [`Verdict::deny`], which guarantee a non-empty
/// reason list and that `step_up` is present exactly when `kind` is
/// `StepUp`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Verdict {
    pub kind: VerdictKind,
    pub reasons: Vec<Reason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_up: Option<StepUp>,
}

impl Verdict {
    pub fn allow(reasons: Vec<Reason>) -> Self {
        Self {
            kind: VerdictKind::Allow,
            reasons: non_empty(reasons, "Allowed by EQC policy evaluation."),
            step_up: None,
        }
    }

    pub fn step_up(reasons: Vec<Reason>, step_up: StepUp) -> Self {
        Self {
            kind: VerdictKind::StepUp,
            reasons: non_empty(reasons, "Step-up required by EQC policy evaluation."),
            step_up: Some(step_up),
        }
    }

    pub fn deny(reasons: Vec<Reason>) -> Self {
        Self {
            kind: VerdictKind::Deny,
            reasons: non_empty(reasons, "Denied by EQC policy evaluation."),
            step_up: None,
        }
    }

    pub fn is_allow(&self) -> bool {
        self.kind == VerdictKind::Allow
    }
}

fn non_empty(reasons: Vec<Reason>, fallback: &str) -> Vec<Reason> {
    if reasons.is_empty() {
        vec![Reason::new(ReasonCode::EngineInvariant, fallback)]
    } else {
        reasons
    }
}
