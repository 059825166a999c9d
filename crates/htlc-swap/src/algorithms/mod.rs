//! # Algorithms Module
//!
//! Digest, secret and timelock algorithms.

pub mod digest;
pub mod secret;
pub mod timelocks;

pub use digest::{digest, Sha256, DIGEST_LEN};
pub use secret::{create_hash_lock, generate_random_secret, verify_secret};
pub use timelocks::{calculate_timelocks, validate_swap_timelocks};
