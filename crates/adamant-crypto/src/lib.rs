pub mod canonical;
pub mod hash;
pub mod token;

pub use canonical::canonical_string;
pub use hash::{fingerprint, sha256_hex};
pub use token::{capability_token, nonce, session_id};
