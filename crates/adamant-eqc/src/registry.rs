//! Policy pack registry.
//!
//! Pack references keep the `"module.path:Attribute"` wire syntax so
//! deployments can enable packs through configuration, but resolution goes
//! through a table of registered builders instead of runtime reflection.
//! An unknown reference fails loudly with `PACK_RESOLUTION_FAILED` the
//! first time it is used.

use std::collections::BTreeMap;
use std::sync::Arc;

use adamant_core::{AdamantError, Verdict};

use crate::classifiers::{DeviceSignals, TxSignals};
use crate::context::ContextSnapshot;
use crate::packs::{HighValueStepUpPack, PolicyPack};

/// Reference under which the high-value pack ships in the default table.
pub const HIGH_VALUE_PACK_REF: &str = "packs.high_value_step_up:HighValueStepUpPack";

type PackBuilder = fn() -> Box<dyn PolicyPack>;

pub struct PolicyPackRegistry {
    builders: BTreeMap<String, PackBuilder>,
    instances: BTreeMap<String, Arc<dyn PolicyPack>>,
}

impl PolicyPackRegistry {
    /// Registry with no known packs.
    pub fn empty() -> Self {
        Self {
            builders: BTreeMap::new(),
            instances: BTreeMap::new(),
        }
    }

    /// Register a zero-argument pack builder under a reference string.
    pub fn register_builder(&mut self, reference: impl Into<String>, builder: PackBuilder) {
        self.builders.insert(reference.into(), builder);
    }

    /// Register an already-constructed pack instance.
    pub fn register_pack(&mut self, reference: impl Into<String>, pack: Arc<dyn PolicyPack>) {
        self.instances.insert(reference.into(), pack);
    }

    fn resolve(&self, reference: &str) -> Result<Arc<dyn PolicyPack>, AdamantError> {
        if let Some(pack) = self.instances.get(reference) {
            return Ok(Arc::clone(pack));
        }
        if let Some(builder) = self.builders.get(reference) {
            return Ok(Arc::from(builder()));
        }
        Err(AdamantError::PackResolutionFailed(reference.to_string()))
    }

    /// Evaluate every enabled pack against the same context and signals.
    ///
    /// References are evaluated in sorted order so the decision is
    /// independent of enable order. Blank references are skipped; packs
    /// returning `None` contribute nothing.
    pub fn evaluate(
        &self,
        ctx: &ContextSnapshot,
        enabled: &[String],
        device_signals: &DeviceSignals,
        tx_signals: &TxSignals,
    ) -> Result<Vec<Verdict>, AdamantError> {
        let mut refs: Vec<&str> = enabled
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect();
        refs.sort_unstable();
        refs.dedup();

        let mut verdicts = Vec::new();
        for reference in refs {
            let pack = self.resolve(reference)?;
            if let Some(verdict) = pack.evaluate(ctx, device_signals, tx_signals) {
                verdicts.push(verdict);
            }
        }
        Ok(verdicts)
    }
}

impl Default for PolicyPackRegistry {
    /// Registry preloaded with the packs this crate ships.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_builder(HIGH_VALUE_PACK_REF, || {
            Box::new(HighValueStepUpPack::default())
        });
        registry
    }
}
