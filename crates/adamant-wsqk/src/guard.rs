//! Guarded executor: the last gate in front of caller-supplied execution.
//!
//! Every check runs before the executor; any failure aborts with no
//! executor invocation. The context-equality check is the replay barrier:
//! the context presented at execution must fingerprint-match the context
//! EQC evaluated. No internal lock is held across the executor call.

use tracing::debug;

use adamant_core::{AdamantError, Timestamp};
use adamant_eqc::ContextSnapshot;

use crate::capability::Capability;
use crate::scope::Scope;
use crate::session::Session;

/// Executor result plus the fingerprint of the context it ran under.
#[derive(Clone, Debug)]
pub struct GuardedOutcome<T> {
    pub result: T,
    pub context_fingerprint: String,
}

/// Run `executor` under the full scope/capability/session check chain.
#[allow(clippy::too_many_arguments)]
pub fn execute_with_scope<T>(
    scope: &Scope,
    context: &ContextSnapshot,
    wallet_id: &str,
    action: &str,
    executor: impl FnOnce(&ContextSnapshot) -> T,
    capability: &Capability,
    session: Option<&Session>,
    nonce: Option<&str>,
    now: Timestamp,
) -> Result<GuardedOutcome<T>, AdamantError> {
    // 1) Scope window.
    scope.assert_active(now)?;

    // 2) Scope identity.
    scope.assert_wallet(wallet_id)?;
    scope.assert_action(action)?;

    // 3) Replay barrier: executing context must equal the evaluated one.
    let context_fingerprint = context.fingerprint()?;
    scope.assert_context(&context_fingerprint)?;

    // 4) Capability authenticity and binding.
    capability.assert_valid(now)?;
    let scope_fingerprint = scope.fingerprint()?;
    if capability.scope_fingerprint != scope_fingerprint {
        return Err(AdamantError::CapabilityInvalid(
            "bound to a different scope".into(),
        ));
    }

    // 5) One-time nonce consumption.
    if let Some(session) = session {
        let nonce = nonce.ok_or_else(|| {
            AdamantError::MalformedInput("nonce required when a session is supplied".into())
        })?;
        session.assert_active(now)?;
        session.consume_nonce(nonce, Some(&scope_fingerprint), now)?;
    }

    // 6) Exactly one execution.
    debug!(wallet = wallet_id, action, "guarded executor running");
    let result = executor(context);
    Ok(GuardedOutcome {
        result,
        context_fingerprint,
    })
}
