//! End-to-end scenarios for the signing gate and the EQC → WSQK path.
//!
//! Run with:
//!   cargo test -p adamant-gate --test gate

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use serde_json::json;

use adamant_core::{AdamantError, ReasonCode, Timestamp, Verdict, VerdictKind};
use adamant_eqc::{
    ContextSnapshot, DefaultDeviceClassifier, DefaultPolicy, DefaultTxClassifier, DeviceSignals,
    EqcEngine, Policy, PolicyPackRegistry, TxSignals, HIGH_VALUE_PACK_REF,
};
use adamant_gate::{MemoryAccountStore, ShieldDecision, ShieldEvaluator, SigningGate, SigningIntent};
use adamant_wsqk::{bind_scope_from_decision, execute_with_scope, issue_capability, Session};

const NOW: Timestamp = 1_766_877_694;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn engine_with_packs(packs: Vec<String>) -> EqcEngine {
    EqcEngine::with_components(
        Box::new(DefaultPolicy),
        Box::new(DefaultDeviceClassifier),
        Box::new(DefaultTxClassifier),
        PolicyPackRegistry::default(),
        Some(packs),
    )
}

fn send_intent() -> SigningIntent {
    let mut intent = SigningIntent::new("w1", "a1");
    intent.action = "send".into();
    intent.asset = "DGB".into();
    intent.to_address = Some("DGB_TEST_ADDR".into());
    intent.amount_minor = Some(1_000);
    intent.extra.insert("device_trusted".into(), json!(true));
    intent.extra.insert("entropy_score".into(), json!(0.9));
    intent
}

fn gate() -> SigningGate {
    SigningGate::new().with_engine(engine_with_packs(vec![]))
}

struct BlockingShield;

impl ShieldEvaluator for BlockingShield {
    fn evaluate(&self, _intent: &SigningIntent) -> ShieldDecision {
        ShieldDecision::block("risk threshold exceeded").with_risk_score(0.99)
    }
}

// ── Scenario 1: browser denial ───────────────────────────────────────────────

#[test]
fn browser_context_denies_and_never_executes() {
    let mut intent = send_intent();
    intent.device_type = "browser".into();
    intent.amount_minor = Some(1);

    let ran = AtomicBool::new(false);
    let err = gate()
        .execute_signing_intent_at(&intent, |_| ran.store(true, Ordering::SeqCst), NOW)
        .unwrap_err();

    assert!(!ran.load(Ordering::SeqCst));
    match err {
        AdamantError::EqcBlocked { verdict } => {
            assert_eq!(verdict.kind, VerdictKind::Deny);
            assert_eq!(verdict.reasons[0].code, ReasonCode::BrowserContextBlocked);
        }
        other => panic!("expected EqcBlocked, got {other:?}"),
    }
}

// ── Scenario 2: DigiDollar mint step-up ──────────────────────────────────────

#[test]
fn digidollar_mint_requires_step_up_at_the_gate() {
    let mut intent = send_intent();
    intent.action = "mint".into();
    intent.asset = "DigiDollar".into();
    intent.to_address = None;
    intent.amount_minor = None;

    let err = gate()
        .execute_signing_intent_at(&intent, |_| (), NOW)
        .unwrap_err();

    match &err {
        AdamantError::EqcBlocked { verdict } => {
            assert_eq!(verdict.kind, VerdictKind::StepUp);
            assert_eq!(
                verdict.reasons[0].code,
                ReasonCode::MintRedeemRequiresStepUp
            );
            let step = verdict.step_up.as_ref().unwrap();
            assert_eq!(step.requirements, vec!["confirm_user_intent"]);
        }
        other => panic!("expected EqcBlocked, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 11);
}

// ── Scenario 3: happy path send ──────────────────────────────────────────────

#[test]
fn happy_path_executes_exactly_once() {
    let calls = AtomicU32::new(0);
    let result = gate()
        .execute_signing_intent_at(
            &send_intent(),
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                json!({"signed": true})
            },
            NOW,
        )
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(result, json!({"signed": true}));
}

#[test]
fn capability_binds_to_the_bound_scope_fingerprint() {
    let engine = engine_with_packs(vec![]);
    let ctx = adamant_gate::build_context(&send_intent(), NOW).unwrap();
    let decision = engine.decide(&ctx).unwrap();
    assert_eq!(decision.verdict.kind, VerdictKind::Allow);

    let bound = bind_scope_from_decision(&decision, "w1", "send", 120, NOW).unwrap();
    let capability = issue_capability(bound.scope.fingerprint().unwrap(), None, NOW);
    assert_eq!(
        capability.scope_fingerprint,
        bound.scope.fingerprint().unwrap()
    );
    assert_eq!(bound.scope.context_fingerprint, decision.context_fingerprint);
}

// ── Scenario 4: high-value tightening ────────────────────────────────────────

#[test]
fn high_value_pack_tightens_the_gate_to_step_up() {
    let mut intent = send_intent();
    intent.amount_minor = Some(10_000_000);

    let gate = SigningGate::new()
        .with_engine(engine_with_packs(vec![HIGH_VALUE_PACK_REF.to_string()]));

    let ran = AtomicBool::new(false);
    let err = gate
        .execute_signing_intent_at(&intent, |_| ran.store(true, Ordering::SeqCst), NOW)
        .unwrap_err();

    assert!(!ran.load(Ordering::SeqCst));
    match err {
        AdamantError::EqcBlocked { verdict } => {
            assert_eq!(verdict.kind, VerdictKind::StepUp);
            assert!(verdict
                .reasons
                .iter()
                .any(|r| r.code == ReasonCode::LargeAmount));
        }
        other => panic!("expected EqcBlocked, got {other:?}"),
    }
}

// ── Scenario 5: watch-only veto before EQC ───────────────────────────────────

struct SpyPolicy(Arc<AtomicBool>);

impl Policy for SpyPolicy {
    fn evaluate(
        &self,
        _ctx: &ContextSnapshot,
        _device_signals: &DeviceSignals,
        _tx_signals: &TxSignals,
    ) -> Verdict {
        self.0.store(true, Ordering::SeqCst);
        Verdict::allow(vec![adamant_core::Reason::new(
            ReasonCode::PolicyRuleMatch,
            "spy allow",
        )])
    }
}

#[test]
fn watch_only_blocks_before_eqc_runs() {
    let eqc_called = Arc::new(AtomicBool::new(false));
    let spy_engine = EqcEngine::with_components(
        Box::new(SpyPolicy(Arc::clone(&eqc_called))),
        Box::new(DefaultDeviceClassifier),
        Box::new(DefaultTxClassifier),
        PolicyPackRegistry::default(),
        Some(vec![]),
    );

    let mut store = MemoryAccountStore::new();
    store.mark_watch_only("w1", "a1");

    let gate = SigningGate::new()
        .with_engine(spy_engine)
        .with_account_store(Box::new(store));

    let err = gate
        .execute_signing_intent_at(&send_intent(), |_| (), NOW)
        .unwrap_err();

    assert_eq!(err.kind(), "WATCH_ONLY_FORBIDDEN");
    assert_eq!(err.exit_code(), 13);
    assert!(!eqc_called.load(Ordering::SeqCst));
}

#[test]
fn watch_only_blocks_via_injected_predicate() {
    let gate = SigningGate::new()
        .with_engine(engine_with_packs(vec![]))
        .with_account_store(Box::new(|_: &str, _: &str| true));

    let err = gate
        .execute_signing_intent_at(&send_intent(), |_| (), NOW)
        .unwrap_err();
    assert_eq!(err.kind(), "WATCH_ONLY_FORBIDDEN");
}

// ── Shield veto ──────────────────────────────────────────────────────────────

#[test]
fn shield_block_is_a_hard_stop() {
    let gate = SigningGate::new()
        .with_engine(engine_with_packs(vec![]))
        .with_shield(Box::new(BlockingShield));

    let ran = AtomicBool::new(false);
    let err = gate
        .execute_signing_intent_at(&send_intent(), |_| ran.store(true, Ordering::SeqCst), NOW)
        .unwrap_err();

    assert!(!ran.load(Ordering::SeqCst));
    assert_eq!(err.kind(), "SHIELD_BLOCKED");
    assert_eq!(err.exit_code(), 12);
}

// ── Scenario 6: replay attempt over the full EQC → WSQK path ─────────────────

#[test]
fn complete_path_blocks_replay() {
    let engine = engine_with_packs(vec![]);
    let ctx = adamant_gate::build_context(&send_intent(), NOW).unwrap();

    // 1) EQC decides.
    let decision = engine.decide(&ctx).unwrap();
    assert_eq!(decision.verdict.kind, VerdictKind::Allow);

    // 2) Bind scope from the decision.
    let bound = bind_scope_from_decision(&decision, "w1", "send", 60, NOW).unwrap();
    let scope_fp = bound.scope.fingerprint().unwrap();

    // 3) Capability + session + single-use nonce.
    let capability = issue_capability(scope_fp.clone(), None, NOW);
    let session = Session::new(Some("w1".into()), 600, NOW).unwrap();
    let nonce = session.issue_nonce();

    // 4) First execution succeeds.
    let out = execute_with_scope(
        &bound.scope,
        &ctx,
        "w1",
        "send",
        |_| json!({"ok": true}),
        &capability,
        Some(&session),
        Some(&nonce),
        NOW,
    )
    .unwrap();
    assert_eq!(out.result, json!({"ok": true}));

    // 5) Replay with the same nonce fails.
    let err = execute_with_scope(
        &bound.scope,
        &ctx,
        "w1",
        "send",
        |_| json!({"ok": true}),
        &capability,
        Some(&session),
        Some(&nonce),
        NOW + 1,
    )
    .unwrap_err();
    assert_eq!(err.kind(), "NONCE_REPLAY");
    assert_eq!(err.exit_code(), 15);

    // 6) An altered context fails the scope barrier even with a new nonce.
    let mut altered = adamant_gate::build_context(&send_intent(), NOW).unwrap();
    altered.action.amount = Some(999_999_999);
    let nonce2 = session.issue_nonce();
    let err = execute_with_scope(
        &bound.scope,
        &altered,
        "w1",
        "send",
        |_| json!({"ok": true}),
        &capability,
        Some(&session),
        Some(&nonce2),
        NOW + 2,
    )
    .unwrap_err();
    assert_eq!(err.kind(), "SCOPE_MISMATCH");
}
