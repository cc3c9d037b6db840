//! adamant-wsqk
//!
//! Execution authority: scopes bound to EQC decisions, single-use
//! capabilities, nonce sessions, and the guarded executor that enforces
//! all of them in front of caller-supplied execution.

pub mod bind;
pub mod capability;
pub mod guard;
pub mod scope;
pub mod session;

pub use bind::{bind_scope_from_decision, BoundScope};
pub use capability::{issue_capability, Capability, CapabilityToken};
pub use guard::{execute_with_scope, GuardedOutcome};
pub use scope::Scope;
pub use session::Session;
