//! Randomness for authority tokens. Everything here draws from the OS
//! CSPRNG; nothing is seeded or reproducible.

use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use adamant_core::CAPABILITY_TOKEN_BYTES;

/// Fresh 256-bit capability token, hex-encoded.
pub fn capability_token() -> String {
    let mut bytes = [0u8; CAPABILITY_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Fresh one-time nonce (v4 UUID). Scope binding is enforced when the
/// nonce is consumed, not when it is issued.
pub fn nonce() -> String {
    Uuid::new_v4().to_string()
}

/// Fresh session identifier (v4 UUID).
pub fn session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_tokens_are_256_bit_hex() {
        let t = capability_token();
        assert_eq!(t.len(), CAPABILITY_TOKEN_BYTES * 2);
        assert!(t.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_and_nonces_do_not_repeat() {
        assert_ne!(capability_token(), capability_token());
        assert_ne!(nonce(), nonce());
        assert_ne!(session_id(), session_id());
    }
}
