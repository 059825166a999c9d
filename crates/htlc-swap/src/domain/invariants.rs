//! # Domain Invariants
//!
//! Business rules shared by the state machine and the timelock planner.

use super::entities::Swap;
use super::errors::HtlcError;
use super::secure_secret::SecureSecret;
use super::value_objects::{Identity, SwapId, Timestamp};
use crate::algorithms::digest::digest;

/// Invariant: Timelock ordering.
///
/// The initiator's leg MUST expire after the responder's leg plus a margin.
/// Once the initiator claims the responder's leg and reveals the secret, the
/// responder needs that margin to claim the initiator's leg before it can be
/// refunded.
pub fn invariant_timelock_ordering(
    initiator_expiration: Timestamp,
    responder_expiration: Timestamp,
    min_margin_secs: u64,
) -> Result<(), HtlcError> {
    if initiator_expiration <= responder_expiration.saturating_add(min_margin_secs) {
        return Err(HtlcError::InvalidTimelockMargin {
            initiator_expiration,
            responder_expiration,
            required_margin: min_margin_secs,
        });
    }
    Ok(())
}

/// Invariant: Secret matches hashlock.
///
/// SHA-256(secret) must equal the hashlock for a valid claim.
pub fn invariant_secret_matches(secret: &SecureSecret, hash_lock: &SwapId) -> bool {
    digest(secret.as_bytes()) == *hash_lock.as_bytes()
}

/// Invariant: Claim authorization.
///
/// With a designated recipient only that identity may claim.
pub fn invariant_authorized_claimer(swap: &Swap, claimer: &Identity) -> Result<(), HtlcError> {
    if swap.is_open_to_anyone() || swap.recipient.as_ref() == Some(claimer) {
        return Ok(());
    }
    Err(HtlcError::Unauthorized {
        action: "claim",
        caller: claimer.clone(),
    })
}

/// Invariant: Refund authorization.
///
/// Only the exact sender may reclaim.
pub fn invariant_authorized_refunder(swap: &Swap, refunder: &Identity) -> Result<(), HtlcError> {
    if swap.sender != *refunder {
        return Err(HtlcError::Unauthorized {
            action: "refund",
            caller: refunder.clone(),
        });
    }
    Ok(())
}
