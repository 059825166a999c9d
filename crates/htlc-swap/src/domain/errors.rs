//! # Domain Errors
//!
//! Every rejection the swap core can produce. Each variant names the exact
//! precondition that failed so off-chain coordinators can tell "too late to
//! claim" apart from "wrong secret".

use super::entities::TransferInstruction;
use super::value_objects::{Identity, SwapId, SwapStatus, Timestamp};
use thiserror::Error;

/// Hash type (32-byte SHA-256).
pub type Hash = [u8; 32];

/// Coarse classification of an [`HtlcError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, caught before any lookup.
    Validation,
    /// Record missing or already present.
    Existence,
    /// Record already resolved.
    State,
    /// Too early or too late.
    Temporal,
    /// Caller is not allowed to perform the action.
    Authorization,
    /// Backing store failure.
    Storage,
    /// Invalid configuration.
    Configuration,
    /// Host could not execute a committed transfer.
    Transfer,
}

/// HTLC error types.
#[derive(Debug, Error)]
pub enum HtlcError {
    /// Commitment identifier is not 64 hex characters.
    #[error("Invalid commitment identifier: {reason}")]
    InvalidCommitment {
        /// What was wrong with it.
        reason: String,
    },

    /// Secret has the wrong byte length.
    #[error("Invalid secret length: expected {expected} bytes, got {got}")]
    InvalidSecretLength {
        /// Required length.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// Amount is zero or below the dust floor.
    #[error("Insufficient amount: {amount} (minimum {minimum})")]
    InsufficientAmount {
        /// Requested amount.
        amount: u128,
        /// Configured minimum.
        minimum: u128,
    },

    /// Expiration is not strictly after the current time.
    #[error("Expiration not in future: expiration={expiration}, now={now}")]
    ExpirationNotInFuture {
        /// Requested expiration.
        expiration: Timestamp,
        /// Host time at call.
        now: Timestamp,
    },

    /// A swap with this commitment already exists (or existed).
    #[error("Swap already exists: {0}")]
    AlreadyExists(SwapId),

    /// No swap with this commitment.
    #[error("Swap not found: {0}")]
    NotFound(SwapId),

    /// Swap has already been resolved.
    #[error("Swap {id} is not open (status: {status})")]
    NotOpen {
        /// Swap identifier.
        id: SwapId,
        /// Current terminal status.
        status: SwapStatus,
    },

    /// Claim attempted at or after expiration.
    #[error("Swap expired: expiration={expiration}, now={now}")]
    Expired {
        /// Swap expiration.
        expiration: Timestamp,
        /// Host time at call.
        now: Timestamp,
    },

    /// Refund attempted before expiration.
    #[error("Swap not yet expired (cannot refund): expiration={expiration}, now={now}")]
    NotYetExpired {
        /// Swap expiration.
        expiration: Timestamp,
        /// Host time at call.
        now: Timestamp,
    },

    /// Digest of the secret does not equal the hashlock.
    #[error("Secret does not match hashlock")]
    SecretMismatch,

    /// Caller is not the identity allowed to perform the action.
    #[error("Unauthorized {action} by {caller}")]
    Unauthorized {
        /// `"claim"` or `"refund"`.
        action: &'static str,
        /// Identity supplied by the host.
        caller: Identity,
    },

    /// Timelocks of the two legs leave too little margin.
    #[error("Invalid timelock margin: initiator={initiator_expiration}, responder={responder_expiration}, required={required_margin}")]
    InvalidTimelockMargin {
        /// Initiator leg expiration.
        initiator_expiration: Timestamp,
        /// Responder leg expiration.
        responder_expiration: Timestamp,
        /// Required margin in seconds.
        required_margin: u64,
    },

    /// Configuration rejected.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Store failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Swap resolved but the host failed to move custody.
    #[error("Transfer failed for swap {}: {reason}", instruction.swap_id)]
    TransferFailed {
        /// The committed instruction, for the host to retry.
        instruction: TransferInstruction,
        /// Executor message.
        reason: String,
    },
}

impl HtlcError {
    /// Taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCommitment { .. }
            | Self::InvalidSecretLength { .. }
            | Self::InsufficientAmount { .. }
            | Self::ExpirationNotInFuture { .. }
            | Self::SecretMismatch
            | Self::InvalidTimelockMargin { .. } => ErrorKind::Validation,
            Self::AlreadyExists(_) | Self::NotFound(_) => ErrorKind::Existence,
            Self::NotOpen { .. } => ErrorKind::State,
            Self::Expired { .. } | Self::NotYetExpired { .. } => ErrorKind::Temporal,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::Storage(_) => ErrorKind::Storage,
            Self::InvalidConfig(_) => ErrorKind::Configuration,
            Self::TransferFailed { .. } => ErrorKind::Transfer,
        }
    }

    /// Stable machine-readable name.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCommitment { .. } => "InvalidCommitment",
            Self::InvalidSecretLength { .. } => "InvalidSecretLength",
            Self::InsufficientAmount { .. } => "InsufficientAmount",
            Self::ExpirationNotInFuture { .. } => "ExpirationNotInFuture",
            Self::AlreadyExists(_) => "AlreadyExists",
            Self::NotFound(_) => "NotFound",
            Self::NotOpen { .. } => "NotOpen",
            Self::Expired { .. } => "Expired",
            Self::NotYetExpired { .. } => "NotYetExpired",
            Self::SecretMismatch => "SecretMismatch",
            Self::Unauthorized { .. } => "Unauthorized",
            Self::InvalidTimelockMargin { .. } => "InvalidTimelockMargin",
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::Storage(_) => "Storage",
            Self::TransferFailed { .. } => "TransferFailed",
        }
    }
}

/// Errors raised by [`crate::ports::SwapStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert of an id that is already stored.
    #[error("Duplicate record: {0}")]
    Duplicate(SwapId),

    /// Update of an id that was never stored.
    #[error("Missing record: {0}")]
    Missing(SwapId),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot decoded but violates store invariants.
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}
