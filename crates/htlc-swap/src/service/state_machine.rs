//! # Swap State Machine
//!
//! The host-independent core. Every operation receives `now` from the caller
//! and never reads a clock, so the same inputs give the same result in every
//! environment.
//!
//! ## Check order
//!
//! | Operation | Rejections, in evaluation order |
//! |-----------|---------------------------------|
//! | initiate  | InvalidCommitment, InsufficientAmount, ExpirationNotInFuture, AlreadyExists |
//! | claim     | InvalidCommitment, NotFound, NotOpen, Expired, InvalidSecretLength, SecretMismatch, Unauthorized |
//! | refund    | InvalidCommitment, NotFound, NotOpen, NotYetExpired, Unauthorized |
//!
//! Claims are rejected at or after expiration even with the correct secret,
//! so claim and refund are separated by time as well as by status.

use crate::domain::{
    invariant_authorized_claimer, invariant_authorized_refunder, invariant_secret_matches,
    HtlcConfig, HtlcError, Identity, ListQuery, StoreError, Swap, SwapId, SwapPage, SwapParams,
    SwapView, Timestamp, TransferInstruction,
};
use crate::algorithms::{calculate_timelocks, validate_swap_timelocks};
use crate::ports::{InitiateRequest, SwapStore};
use crate::validation::{
    clamp_limit, parse_commitment, validate_amount, validate_expiration, validate_secret,
};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Swap state machine over a [`SwapStore`].
///
/// Mutations are serialized by an internal lock; reads are not.
pub struct SwapStateMachine<S: SwapStore> {
    store: S,
    config: HtlcConfig,
    write_lock: Mutex<()>,
}

fn log_rejection(op: &'static str, err: &HtlcError) {
    debug!(op, code = err.code(), error = %err, "[htlc] request rejected");
}

impl<S: SwapStore> SwapStateMachine<S> {
    /// Create a state machine; fails on an invalid config.
    pub fn new(store: S, config: HtlcConfig) -> Result<Self, HtlcError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            write_lock: Mutex::new(()),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &HtlcConfig {
        &self.config
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a new swap funded by `sender`.
    pub fn initiate(
        &self,
        request: &InitiateRequest,
        sender: Identity,
        now: Timestamp,
    ) -> Result<SwapId, HtlcError> {
        self.try_initiate(request, sender, now)
            .inspect_err(|e| log_rejection("initiate", e))
    }

    fn try_initiate(
        &self,
        request: &InitiateRequest,
        sender: Identity,
        now: Timestamp,
    ) -> Result<SwapId, HtlcError> {
        let id = parse_commitment(&request.hash_lock)?;
        validate_amount(request.amount, &self.config)?;
        validate_expiration(request.expiration, now)?;

        let _guard = self.write_lock.lock();
        if self.store.contains(&id)? {
            return Err(HtlcError::AlreadyExists(id));
        }

        let swap = Swap::new(SwapParams {
            id,
            sender,
            recipient: request.recipient.clone(),
            amount: request.amount,
            expiration: request.expiration,
            created_at: now,
        });

        match self.store.insert(swap) {
            Ok(()) => {}
            Err(StoreError::Duplicate(id)) => return Err(HtlcError::AlreadyExists(id)),
            Err(e) => return Err(e.into()),
        }

        info!(
            swap_id = %id,
            amount = %request.amount,
            expiration = request.expiration,
            "[htlc] swap initiated"
        );
        Ok(id)
    }

    /// Claim an open swap by revealing its secret.
    pub fn claim(
        &self,
        hash_lock: &str,
        secret: &[u8],
        claimer: Identity,
        now: Timestamp,
    ) -> Result<TransferInstruction, HtlcError> {
        self.try_claim(hash_lock, secret, claimer, now)
            .inspect_err(|e| log_rejection("claim", e))
    }

    fn try_claim(
        &self,
        hash_lock: &str,
        secret: &[u8],
        claimer: Identity,
        now: Timestamp,
    ) -> Result<TransferInstruction, HtlcError> {
        let id = parse_commitment(hash_lock)?;

        let _guard = self.write_lock.lock();
        let mut swap = self.load(&id)?;

        if swap.status.is_terminal() {
            return Err(HtlcError::NotOpen {
                id,
                status: swap.status,
            });
        }
        if swap.is_expired(now) {
            return Err(HtlcError::Expired {
                expiration: swap.expiration,
                now,
            });
        }
        let secret = validate_secret(secret)?;
        if !invariant_secret_matches(&secret, &swap.hash_lock) {
            return Err(HtlcError::SecretMismatch);
        }
        invariant_authorized_claimer(&swap, &claimer)?;

        let instruction = swap.mark_claimed(claimer, secret, now)?;
        self.store.update(swap)?;

        info!(
            swap_id = %id,
            claimer = %instruction.to,
            amount = %instruction.amount,
            "[htlc] swap claimed"
        );
        Ok(instruction)
    }

    /// Return an expired swap to its sender.
    pub fn refund(
        &self,
        hash_lock: &str,
        refunder: Identity,
        now: Timestamp,
    ) -> Result<TransferInstruction, HtlcError> {
        self.try_refund(hash_lock, refunder, now)
            .inspect_err(|e| log_rejection("refund", e))
    }

    fn try_refund(
        &self,
        hash_lock: &str,
        refunder: Identity,
        now: Timestamp,
    ) -> Result<TransferInstruction, HtlcError> {
        let id = parse_commitment(hash_lock)?;

        let _guard = self.write_lock.lock();
        let mut swap = self.load(&id)?;

        if swap.status.is_terminal() {
            return Err(HtlcError::NotOpen {
                id,
                status: swap.status,
            });
        }
        if !swap.is_expired(now) {
            return Err(HtlcError::NotYetExpired {
                expiration: swap.expiration,
                now,
            });
        }
        invariant_authorized_refunder(&swap, &refunder)?;

        let instruction = swap.mark_refunded(refunder, now)?;
        self.store.update(swap)?;

        info!(
            swap_id = %id,
            sender = %instruction.to,
            amount = %instruction.amount,
            "[htlc] swap refunded"
        );
        Ok(instruction)
    }

    /// Read one swap, secret redacted unless claimed.
    pub fn query(&self, hash_lock: &str) -> Result<SwapView, HtlcError> {
        let id = parse_commitment(hash_lock)?;
        Ok(self.load(&id)?.view())
    }

    /// Enumerate swaps in creation order.
    ///
    /// At most `max_list_limit` items are returned and at most
    /// `max_list_scan` index entries are examined per call; `next_cursor`
    /// resumes where this call stopped.
    pub fn list(&self, query: ListQuery) -> Result<SwapPage, HtlcError> {
        let limit = clamp_limit(query.limit, &self.config);
        let total = self.store.len()?;
        let mut cursor = query.cursor.unwrap_or(0).min(total);
        let scan_end = cursor.saturating_add(self.config.max_list_scan).min(total);

        let mut items = Vec::with_capacity(limit);
        'scan: while cursor < scan_end {
            let batch = (scan_end - cursor).min(limit);
            let ids = self.store.index_range(cursor, batch)?;
            if ids.is_empty() {
                break;
            }
            for id in ids {
                cursor += 1;
                let swap = self.store.get(&id)?.ok_or_else(|| {
                    StoreError::Corrupt(format!("index entry {id} has no record"))
                })?;
                if query.status.map_or(true, |s| s == swap.status) {
                    items.push(swap.view());
                    if items.len() == limit {
                        break 'scan;
                    }
                }
            }
        }

        Ok(SwapPage {
            items,
            next_cursor: (cursor < total).then_some(cursor),
        })
    }

    /// Expirations for a mirrored swap using the configured margin.
    ///
    /// Returns `(initiator_expiration, responder_expiration)`.
    pub fn plan_timelocks(
        &self,
        now: Timestamp,
        responder_window_secs: u64,
    ) -> (Timestamp, Timestamp) {
        calculate_timelocks(
            now,
            responder_window_secs,
            self.config.min_timelock_margin_secs,
        )
    }

    /// Check that two legs leave the configured margin.
    pub fn check_timelocks(
        &self,
        initiator_expiration: Timestamp,
        responder_expiration: Timestamp,
    ) -> Result<(), HtlcError> {
        validate_swap_timelocks(
            initiator_expiration,
            responder_expiration,
            self.config.min_timelock_margin_secs,
        )
    }

    fn load(&self, id: &SwapId) -> Result<Swap, HtlcError> {
        self.store.get(id)?.ok_or(HtlcError::NotFound(*id))
    }
}
