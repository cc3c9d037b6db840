//! adamant-gate
//!
//! The runtime boundary: EQC decides, WSQK executes, the gate enforces.
//! `SigningGate::execute_signing_intent` is the one obvious entry point
//! for signing-like wallet operations.

pub mod accounts;
pub mod gate;
pub mod intent;
pub mod shield;

pub use accounts::{AccountStore, MemoryAccountStore};
pub use gate::SigningGate;
pub use intent::{build_context, SigningIntent};
pub use shield::{DefaultShieldEvaluator, ShieldDecision, ShieldEvaluator};
