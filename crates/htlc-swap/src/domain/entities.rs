//! # Domain Entities
//!
//! The swap record, its redacted read view, and the transfer instruction
//! handed to the host after a terminal transition.

use super::errors::HtlcError;
use super::secure_secret::SecureSecret;
use super::value_objects::{Identity, SwapId, SwapStatus, Timestamp, TransferReason};
use serde::{Deserialize, Serialize};

/// A hashed time-locked swap.
///
/// `id` and `hash_lock` are the same value; both are kept so the record reads
/// the same way in every environment that stores it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    /// Commitment identifier.
    pub id: SwapId,
    /// Identity that funded the swap.
    pub sender: Identity,
    /// Sole permitted claimer, if any.
    pub recipient: Option<Identity>,
    /// Escrowed amount in the host's smallest unit.
    pub amount: u128,
    /// Digest the secret must hash to.
    pub hash_lock: SwapId,
    /// Claims valid strictly before, refunds at or after.
    pub expiration: Timestamp,
    /// Current state.
    pub status: SwapStatus,
    /// Host time at creation.
    pub created_at: Timestamp,
    /// Host time of the terminal transition.
    pub resolved_at: Option<Timestamp>,
    /// Identity that performed the terminal transition.
    pub resolved_by: Option<Identity>,
    /// Preimage, present only once claimed.
    pub revealed_secret: Option<SecureSecret>,
}

/// Parameters for creating a swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapParams {
    /// Commitment identifier / hashlock.
    pub id: SwapId,
    /// Funding identity.
    pub sender: Identity,
    /// Optional designated claimer.
    pub recipient: Option<Identity>,
    /// Amount locked.
    pub amount: u128,
    /// Expiration timestamp.
    pub expiration: Timestamp,
    /// Creation timestamp.
    pub created_at: Timestamp,
}

impl Swap {
    /// Create a new open swap.
    pub fn new(params: SwapParams) -> Self {
        Self {
            id: params.id,
            sender: params.sender,
            recipient: params.recipient,
            amount: params.amount,
            hash_lock: params.id,
            expiration: params.expiration,
            status: SwapStatus::Open,
            created_at: params.created_at,
            resolved_at: None,
            resolved_by: None,
            revealed_secret: None,
        }
    }

    /// At or past expiration.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expiration
    }

    /// Any identity may claim when no recipient is designated.
    pub fn is_open_to_anyone(&self) -> bool {
        self.recipient.is_none()
    }

    fn transition_to(&mut self, next: SwapStatus) -> Result<(), HtlcError> {
        if !self.status.can_transition_to(next) {
            return Err(HtlcError::NotOpen {
                id: self.id,
                status: self.status,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Record a successful claim. Preconditions are checked by the state machine.
    pub fn mark_claimed(
        &mut self,
        claimer: Identity,
        secret: SecureSecret,
        now: Timestamp,
    ) -> Result<TransferInstruction, HtlcError> {
        self.transition_to(SwapStatus::Claimed)?;
        self.resolved_at = Some(now);
        self.resolved_by = Some(claimer.clone());
        self.revealed_secret = Some(secret);
        Ok(TransferInstruction {
            swap_id: self.id,
            to: claimer,
            amount: self.amount,
            reason: TransferReason::Claim,
        })
    }

    /// Record a successful refund. Preconditions are checked by the state machine.
    pub fn mark_refunded(
        &mut self,
        refunder: Identity,
        now: Timestamp,
    ) -> Result<TransferInstruction, HtlcError> {
        self.transition_to(SwapStatus::Refunded)?;
        self.resolved_at = Some(now);
        self.resolved_by = Some(refunder);
        Ok(TransferInstruction {
            swap_id: self.id,
            to: self.sender.clone(),
            amount: self.amount,
            reason: TransferReason::Refund,
        })
    }

    /// Read view with the secret redacted unless claimed.
    pub fn view(&self) -> SwapView {
        let revealed_secret = match self.status {
            SwapStatus::Claimed => self.revealed_secret.as_ref().map(SecureSecret::to_hex),
            _ => None,
        };
        SwapView {
            id: self.id,
            sender: self.sender.clone(),
            recipient: self.recipient.clone(),
            amount: self.amount,
            hash_lock: self.hash_lock,
            expiration: self.expiration,
            status: self.status,
            created_at: self.created_at,
            resolved_at: self.resolved_at,
            resolved_by: self.resolved_by.clone(),
            revealed_secret,
        }
    }
}

/// What `query` and `list` return.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapView {
    /// Commitment identifier.
    pub id: SwapId,
    /// Funding identity.
    pub sender: Identity,
    /// Designated claimer.
    pub recipient: Option<Identity>,
    /// Amount locked.
    pub amount: u128,
    /// Hashlock.
    pub hash_lock: SwapId,
    /// Expiration.
    pub expiration: Timestamp,
    /// Status.
    pub status: SwapStatus,
    /// Creation time.
    pub created_at: Timestamp,
    /// Resolution time.
    pub resolved_at: Option<Timestamp>,
    /// Resolver.
    pub resolved_by: Option<Identity>,
    /// Hex preimage, only for claimed swaps.
    pub revealed_secret: Option<String>,
}

/// One page of `list` results.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPage {
    /// Matching swaps in creation order.
    pub items: Vec<SwapView>,
    /// Pass back as `ListQuery::cursor` to continue; `None` at the end.
    pub next_cursor: Option<usize>,
}

/// Instruction for the host to move escrowed custody.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInstruction {
    /// Swap that produced it.
    pub swap_id: SwapId,
    /// Destination identity.
    pub to: Identity,
    /// Amount to move.
    pub amount: u128,
    /// Claim or refund.
    pub reason: TransferReason,
}
