//! Shield seam. The Shield risk engine is an external collaborator; the
//! gate only depends on this interface and treats any blocked decision as
//! a hard stop.

use serde::{Deserialize, Serialize};

use crate::intent::SigningIntent;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ShieldDecision {
    pub blocked: bool,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
}

impl ShieldDecision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            blocked: false,
            reason: reason.into(),
            risk_score: None,
        }
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            blocked: true,
            reason: reason.into(),
            risk_score: None,
        }
    }

    pub fn with_risk_score(mut self, score: f64) -> Self {
        self.risk_score = Some(score);
        self
    }
}

pub trait ShieldEvaluator: Send + Sync {
    fn evaluate(&self, intent: &SigningIntent) -> ShieldDecision;
}

/// Safe no-op evaluator: allows everything. Wiring the gate in does not
/// change behaviour until a real Shield client is plugged into this seam.
pub struct DefaultShieldEvaluator;

impl ShieldEvaluator for DefaultShieldEvaluator {
    fn evaluate(&self, _intent: &SigningIntent) -> ShieldDecision {
        ShieldDecision::allow("shield_default_allow")
    }
}
