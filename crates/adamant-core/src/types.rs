/// Unix timestamp (seconds, UTC).
pub type Timestamp = i64;

/// Asset amount in minor units (satoshi-scale integers, never floats).
pub type AmountMinor = u64;

/// Current wall-clock time as a Unix timestamp.
///
/// Only outermost call sites (gate, CLI) read the clock; every validity
/// check in the core takes `now` explicitly so decisions stay replayable.
pub fn unix_now() -> Timestamp {
    chrono::Utc::now().timestamp()
}
