pub mod constants;
pub mod error;
pub mod types;
pub mod verdict;

pub use constants::*;
pub use error::AdamantError;
pub use types::{unix_now, AmountMinor, Timestamp};
pub use verdict::{Reason, ReasonCode, StepUp, Verdict, VerdictKind};
