//! # HTLC Swap Core
//!
//! Hashed time-locked escrow for cross-party atomic swaps.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A sender locks an amount under the SHA-256 digest of a secret. Whoever
//! presents the secret before expiration claims it; after expiration only
//! the sender can take it back. Revealing the secret on one side lets the
//! counterparty claim the mirrored swap on the other.
//!
//! ## Guarantees
//!
//! | Property | Enforced by |
//! |----------|-------------|
//! | One terminal transition per swap | `SwapStatus::can_transition_to` + serialized writes |
//! | Claim iff `digest(secret) == hash_lock` and `now < expiration` | `SwapStateMachine::claim` |
//! | Refund iff `now >= expiration`, sender only | `SwapStateMachine::refund` |
//! | Rejected calls never mutate state | validate-then-commit in every operation |
//! | Secrets zeroized on drop, redacted in `Debug` | `SecureSecret` |
//!
//! ## Module Structure
//!
//! ```text
//! htlc-swap/
//! ├── domain/       # Swap, SwapId, Identity, errors, config, invariants
//! ├── algorithms/   # SHA-256, secret helpers, timelock planning
//! ├── validation    # pure request checks
//! ├── ports/        # HtlcApi, SwapStore, Clock, TransferExecutor
//! ├── service/      # SwapStateMachine, HtlcService
//! └── adapters/     # stores, clocks, transfer executor
//! ```
//!
//! ## Example
//!
//! ```
//! use htlc_swap::{
//!     create_hash_lock, generate_random_secret, HtlcConfig, Identity, InMemorySwapStore,
//!     InitiateRequest, SwapStateMachine, SwapStatus,
//! };
//!
//! let machine = SwapStateMachine::new(InMemorySwapStore::new(), HtlcConfig::default()).unwrap();
//! let secret = generate_random_secret();
//! let lock = create_hash_lock(&secret);
//!
//! let request = InitiateRequest {
//!     hash_lock: lock.to_hex(),
//!     recipient: Some(Identity::new("bob")),
//!     expiration: 2_000,
//!     amount: 5_000,
//! };
//! machine.initiate(&request, Identity::new("alice"), 1_000).unwrap();
//! machine
//!     .claim(&lock.to_hex(), secret.as_bytes(), Identity::new("bob"), 1_500)
//!     .unwrap();
//!
//! assert_eq!(machine.query(&lock.to_hex()).unwrap().status, SwapStatus::Claimed);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;
pub mod validation;

// Re-exports
pub use adapters::{
    InMemorySwapStore, JsonFileSwapStore, ManualClock, RecordingTransferExecutor, SystemClock,
};
pub use algorithms::{
    calculate_timelocks, create_hash_lock, digest, generate_random_secret,
    validate_swap_timelocks, verify_secret, Sha256,
};
pub use domain::{
    invariant_authorized_claimer, invariant_authorized_refunder, invariant_secret_matches,
    invariant_timelock_ordering, ErrorKind, Hash, HtlcConfig, HtlcError, Identity, ListQuery,
    SecureSecret, StoreError, Swap, SwapId, SwapPage, SwapStatus, SwapView, Timestamp,
    TransferInstruction, TransferReason, MIN_TIMELOCK_MARGIN_SECS, SECRET_LEN,
};
pub use ports::{Clock, HtlcApi, InitiateRequest, SwapStore, TransferExecutor};
pub use service::{HtlcService, SwapStateMachine};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
