use serde::Serialize;
use sha2::{Digest, Sha256};

use adamant_core::AdamantError;

use crate::canonical::canonical_string;

/// SHA-256 of arbitrary bytes, hex-encoded (64 lowercase chars).
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// SHA-256 hex digest of a value's canonical JSON form.
///
/// This is the fingerprint primitive anchoring all downstream authority:
/// context fingerprints, scope fingerprints, and intent hashes all reduce
/// to this function.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String, AdamantError> {
    Ok(sha256_hex(canonical_string(value)?.as_bytes()))
}
