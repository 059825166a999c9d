//! # Timelock Planning
//!
//! Expiration helpers for the two legs of a swap. The core never links the
//! two legs itself; these helpers let the parties pick expirations that keep
//! the swap atomic.

use crate::domain::{invariant_timelock_ordering, HtlcError, Timestamp};

/// Validate timelock ordering for a swap's two legs.
pub fn validate_swap_timelocks(
    initiator_expiration: Timestamp,
    responder_expiration: Timestamp,
    min_margin_secs: u64,
) -> Result<(), HtlcError> {
    invariant_timelock_ordering(initiator_expiration, responder_expiration, min_margin_secs)
}

/// Calculate `(initiator_expiration, responder_expiration)` for a swap
/// starting at `now`.
///
/// The responder's leg stays open for `responder_window_secs`; the
/// initiator's leg runs one margin (plus a second) beyond it.
pub fn calculate_timelocks(
    now: Timestamp,
    responder_window_secs: u64,
    min_margin_secs: u64,
) -> (Timestamp, Timestamp) {
    let responder = now.saturating_add(responder_window_secs);
    let initiator = responder.saturating_add(min_margin_secs).saturating_add(1);
    (initiator, responder)
}
