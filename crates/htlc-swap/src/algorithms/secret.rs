//! # Secret Generation and Verification
//!
//! Helpers for the party that prepares a swap and for anyone checking a
//! revealed preimage against a hashlock.

use super::digest::digest;
use crate::domain::{SecureSecret, SwapId, SECRET_LEN};
use rand::RngCore;
use zeroize::Zeroize;

/// Generate a cryptographically secure random secret.
pub fn generate_random_secret() -> SecureSecret {
    let mut bytes = [0u8; SECRET_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    let secret = SecureSecret::new(bytes);
    bytes.zeroize();
    secret
}

/// Hashlock (and commitment identifier) for a secret.
pub fn create_hash_lock(secret: &SecureSecret) -> SwapId {
    SwapId::new(digest(secret.as_bytes()))
}

/// Verify that a candidate preimage matches a hashlock.
///
/// Preimages of the wrong length never match, whatever they hash to.
pub fn verify_secret(candidate: &[u8], hash_lock: &SwapId) -> bool {
    candidate.len() == SECRET_LEN && digest(candidate) == *hash_lock.as_bytes()
}
