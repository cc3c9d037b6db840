//! adamant-eqc
//!
//! Equilibrium Confirmation: the deterministic decision engine of the
//! wallet OS. Reduces an immutable context snapshot to ALLOW, STEP_UP, or
//! DENY with structured reasons. Policy packs are additive and may only
//! tighten the base verdict.

pub mod classifiers;
pub mod context;
pub mod decision;
pub mod engine;
pub mod packs;
pub mod policy;
pub mod registry;

pub use classifiers::{
    AmountBand, DefaultDeviceClassifier, DefaultTxClassifier, DeviceClassifier, DeviceSignals,
    TxClassifier, TxSignals,
};
pub use context::{ActionContext, ContextSnapshot, DeviceContext, NetworkContext, UserContext};
pub use decision::{Decision, DecisionSignals, InvariantSignal};
pub use engine::EqcEngine;
pub use packs::{HighValueStepUpPack, PolicyPack};
pub use policy::{DefaultPolicy, Policy};
pub use registry::{PolicyPackRegistry, HIGH_VALUE_PACK_REF};
