//! PKCE (RFC 7636) and random login parameters.
//!
//! Every login carries a fresh code verifier, `state` and `nonce`. All
//! three are 32 random bytes encoded as unpadded base64url, which yields
//! 43 characters from the unreserved set RFC 7636 allows.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// 32 random bytes, base64url without padding.
pub fn random_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// code_challenge = BASE64URL(SHA256(ASCII(code_verifier)))
pub fn code_challenge(code_verifier: &str) -> String {
    let hash = Sha256::digest(code_verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Compares two login parameters without leaking timing.
pub fn tokens_match(expected: &str, actual: &str) -> bool {
    expected.as_bytes().ct_eq(actual.as_bytes()).into()
}

/// PKCE pair: the verifier stays on the server, the challenge goes to
/// the authorize endpoint.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub code_verifier: String,
    pub code_challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        let code_verifier = random_token();
        let code_challenge = code_challenge(&code_verifier);
        Self {
            code_verifier,
            code_challenge,
        }
    }
}
