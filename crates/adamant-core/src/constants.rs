//! Protocol constants for the decision-and-authority core.

use crate::types::{AmountMinor, Timestamp};

/// Default lifetime of a bound scope (seconds). The signing gate binds a
/// scope with this TTL unless the caller overrides it.
pub const DEFAULT_SCOPE_TTL_SECS: Timestamp = 120;

/// Default lifetime of a WSQK session (seconds).
pub const DEFAULT_SESSION_TTL_SECS: Timestamp = 60;

/// Capability tokens carry this many bytes of OS-CSPRNG entropy (256 bits).
pub const CAPABILITY_TOKEN_BYTES: usize = 32;

/// The step-up requirement every STEP_UP verdict must at minimum carry.
pub const STEP_UP_CONFIRM_INTENT: &str = "confirm_user_intent";

/// Environment variable holding comma-separated policy pack references.
pub const POLICY_PACKS_ENV: &str = "EQC_POLICY_PACKS";

/// Default threshold (minor units) for the high-value step-up pack.
pub const HIGH_VALUE_THRESHOLD_MINOR: AmountMinor = 10_000;

/// Network entropy scores below this floor trip the base policy.
pub const LOW_ENTROPY_FLOOR: f64 = 0.25;

/// Amount classifier band boundaries (minor units, inclusive lower edges).
pub const AMOUNT_BAND_MEDIUM_FLOOR: AmountMinor = 1_000;
pub const AMOUNT_BAND_HIGH_FLOOR: AmountMinor = 100_000;
