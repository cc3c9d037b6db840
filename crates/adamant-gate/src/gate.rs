//! The signing gate: the one entry point for signing-like execution.
//!
//! No private-key operation may proceed unless the account can sign, the
//! EQC verdict is ALLOW, and Shield does not block. With WSQK enabled the
//! executor additionally runs under a scope-bound capability; disabling
//! WSQK never skips the gates themselves.

use tracing::{info, warn};

use adamant_core::{AdamantError, Timestamp, DEFAULT_SCOPE_TTL_SECS};
use adamant_core::unix_now;
use adamant_eqc::{ContextSnapshot, EqcEngine};
use adamant_wsqk::{bind_scope_from_decision, execute_with_scope, issue_capability};

use crate::accounts::AccountStore;
use crate::intent::{build_context, SigningIntent};
use crate::shield::{DefaultShieldEvaluator, ShieldEvaluator};

/// Accounts are signing-capable unless a store says otherwise.
struct NoWatchOnlyAccounts;

impl AccountStore for NoWatchOnlyAccounts {
    fn is_watch_only(&self, _wallet_id: &str, _account_id: &str) -> bool {
        false
    }
}

pub struct SigningGate {
    engine: EqcEngine,
    shield: Box<dyn ShieldEvaluator>,
    accounts: Box<dyn AccountStore>,
    use_wsqk: bool,
    scope_ttl_seconds: Timestamp,
}

impl Default for SigningGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningGate {
    pub fn new() -> Self {
        Self {
            engine: EqcEngine::new(),
            shield: Box::new(DefaultShieldEvaluator),
            accounts: Box::new(NoWatchOnlyAccounts),
            use_wsqk: true,
            scope_ttl_seconds: DEFAULT_SCOPE_TTL_SECS,
        }
    }

    pub fn with_engine(mut self, engine: EqcEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_shield(mut self, shield: Box<dyn ShieldEvaluator>) -> Self {
        self.shield = shield;
        self
    }

    pub fn with_account_store(mut self, accounts: Box<dyn AccountStore>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_scope_ttl(mut self, ttl_seconds: Timestamp) -> Self {
        self.scope_ttl_seconds = ttl_seconds;
        self
    }

    /// Run the executor directly after the gates pass, without scope and
    /// capability binding. The gates themselves always run.
    pub fn with_use_wsqk(mut self, use_wsqk: bool) -> Self {
        self.use_wsqk = use_wsqk;
        self
    }

    pub fn engine(&self) -> &EqcEngine {
        &self.engine
    }

    /// Execute a signing-like operation under EQC + Shield (+ WSQK).
    pub fn execute_signing_intent<T>(
        &self,
        intent: &SigningIntent,
        executor: impl FnOnce(&ContextSnapshot) -> T,
    ) -> Result<T, AdamantError> {
        self.execute_signing_intent_at(intent, executor, unix_now())
    }

    /// Time-explicit variant of [`execute_signing_intent`]; every validity
    /// window is evaluated against the supplied `now`.
    ///
    /// [`execute_signing_intent`]: Self::execute_signing_intent
    pub fn execute_signing_intent_at<T>(
        &self,
        intent: &SigningIntent,
        executor: impl FnOnce(&ContextSnapshot) -> T,
        now: Timestamp,
    ) -> Result<T, AdamantError> {
        validate_intent(intent)?;

        // 1) Watch-only veto, before EQC ever sees the intent.
        if self
            .accounts
            .is_watch_only(&intent.wallet_id, &intent.account_id)
        {
            warn!(
                wallet = %intent.wallet_id,
                account = %intent.account_id,
                "watch-only account attempted a signing action"
            );
            return Err(AdamantError::WatchOnlyForbidden {
                wallet_id: intent.wallet_id.clone(),
                account_id: intent.account_id.clone(),
            });
        }

        // 2) EQC must allow.
        let context = build_context(intent, now)?;
        let decision = self.engine.decide(&context)?;
        if !decision.verdict.is_allow() {
            info!(
                wallet = %intent.wallet_id,
                action = %intent.action,
                verdict = %decision.verdict.kind,
                "eqc blocked signing intent"
            );
            return Err(AdamantError::EqcBlocked {
                verdict: decision.verdict,
            });
        }

        // 3) Shield must not block.
        let shield_decision = self.shield.evaluate(intent);
        if shield_decision.blocked {
            warn!(
                wallet = %intent.wallet_id,
                reason = %shield_decision.reason,
                "shield blocked signing intent"
            );
            return Err(AdamantError::ShieldBlocked {
                reason: shield_decision.reason,
            });
        }

        // 4) Execute, under WSQK scope binding unless opted out.
        if !self.use_wsqk {
            return Ok(executor(&context));
        }

        let bound = bind_scope_from_decision(
            &decision,
            intent.wallet_id.clone(),
            intent.action.clone(),
            self.scope_ttl_seconds,
            now,
        )?;
        let capability = issue_capability(bound.scope.fingerprint()?, None, now);
        let outcome = execute_with_scope(
            &bound.scope,
            &context,
            &intent.wallet_id,
            &intent.action,
            executor,
            &capability,
            None,
            None,
            now,
        )?;
        info!(
            wallet = %intent.wallet_id,
            action = %intent.action,
            fingerprint = %outcome.context_fingerprint,
            "signing intent executed"
        );
        Ok(outcome.result)
    }
}

fn validate_intent(intent: &SigningIntent) -> Result<(), AdamantError> {
    if intent.wallet_id.is_empty() || intent.account_id.is_empty() {
        return Err(AdamantError::MalformedInput(
            "wallet_id and account_id are required".into(),
        ));
    }
    let action = intent.action.trim().to_lowercase();
    if action.is_empty() {
        return Err(AdamantError::MalformedInput("action is required".into()));
    }
    if matches!(action.as_str(), "send" | "transfer")
        && (intent.destination().is_none() || intent.effective_amount().is_none())
    {
        return Err(AdamantError::MalformedInput(
            "send/transfer requires a destination and an amount".into(),
        ));
    }
    Ok(())
}
