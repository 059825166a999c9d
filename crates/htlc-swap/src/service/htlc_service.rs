//! HTLC Service
//!
//! Wires the state machine to the host ports: time from a [`Clock`], custody
//! movement through a [`TransferExecutor`]. A transfer is dispatched only
//! after the state machine has committed the transition, and only once.

use super::state_machine::SwapStateMachine;
use crate::domain::{
    HtlcConfig, HtlcError, Identity, ListQuery, SwapId, SwapPage, SwapView, TransferInstruction,
};
use crate::ports::{Clock, HtlcApi, InitiateRequest, SwapStore, TransferExecutor};
use async_trait::async_trait;
use tracing::{error, info};

/// Host-facing swap service.
pub struct HtlcService<S, C, T>
where
    S: SwapStore,
    C: Clock,
    T: TransferExecutor,
{
    machine: SwapStateMachine<S>,
    clock: C,
    executor: T,
}

impl<S, C, T> HtlcService<S, C, T>
where
    S: SwapStore,
    C: Clock,
    T: TransferExecutor,
{
    /// Create a service; fails on an invalid config.
    pub fn new(store: S, clock: C, executor: T, config: HtlcConfig) -> Result<Self, HtlcError> {
        Ok(Self {
            machine: SwapStateMachine::new(store, config)?,
            clock,
            executor,
        })
    }

    /// The pure state machine behind this service.
    pub fn machine(&self) -> &SwapStateMachine<S> {
        &self.machine
    }

    /// The host clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The transfer executor.
    pub fn executor(&self) -> &T {
        &self.executor
    }

    async fn dispatch(
        &self,
        instruction: TransferInstruction,
    ) -> Result<TransferInstruction, HtlcError> {
        match self.executor.execute(&instruction).await {
            Ok(()) => {
                info!(
                    swap_id = %instruction.swap_id,
                    to = %instruction.to,
                    amount = %instruction.amount,
                    reason = ?instruction.reason,
                    "[htlc] transfer dispatched"
                );
                Ok(instruction)
            }
            Err(e) => {
                error!(
                    swap_id = %instruction.swap_id,
                    error = %e,
                    "[htlc] transfer failed after commit; host must retry"
                );
                Err(HtlcError::TransferFailed {
                    instruction,
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl<S, C, T> HtlcApi for HtlcService<S, C, T>
where
    S: SwapStore,
    C: Clock,
    T: TransferExecutor,
{
    async fn initiate(
        &self,
        request: InitiateRequest,
        caller: Identity,
    ) -> Result<SwapId, HtlcError> {
        self.machine.initiate(&request, caller, self.clock.now())
    }

    async fn claim(
        &self,
        hash_lock: &str,
        secret: &[u8],
        caller: Identity,
    ) -> Result<TransferInstruction, HtlcError> {
        let instruction = self
            .machine
            .claim(hash_lock, secret, caller, self.clock.now())?;
        self.dispatch(instruction).await
    }

    async fn refund(
        &self,
        hash_lock: &str,
        caller: Identity,
    ) -> Result<TransferInstruction, HtlcError> {
        let instruction = self.machine.refund(hash_lock, caller, self.clock.now())?;
        self.dispatch(instruction).await
    }

    fn query(&self, hash_lock: &str) -> Result<SwapView, HtlcError> {
        self.machine.query(hash_lock)
    }

    fn list(&self, query: ListQuery) -> Result<SwapPage, HtlcError> {
        self.machine.list(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemorySwapStore, ManualClock, RecordingTransferExecutor};
    use crate::algorithms::{create_hash_lock, generate_random_secret};
    use crate::domain::{SwapStatus, TransferReason};

    const T: u64 = 1_700_000_000;

    type TestService = HtlcService<InMemorySwapStore, ManualClock, RecordingTransferExecutor>;

    fn service() -> TestService {
        HtlcService::new(
            InMemorySwapStore::new(),
            ManualClock::new(T),
            RecordingTransferExecutor::new(),
            HtlcConfig::default(),
        )
        .unwrap()
    }

    fn request(lock: &SwapId) -> InitiateRequest {
        InitiateRequest {
            hash_lock: lock.to_hex(),
            recipient: Some(Identity::new("bob")),
            expiration: T + 3600,
            amount: 1_000_000,
        }
    }

    #[tokio::test]
    async fn test_claim_dispatches_once() {
        let svc = service();
        let secret = generate_random_secret();
        let lock = create_hash_lock(&secret);
        svc.initiate(request(&lock), Identity::new("alice"))
            .await
            .unwrap();

        svc.clock().advance(10);
        let ix = svc
            .claim(&lock.to_hex(), secret.as_bytes(), Identity::new("bob"))
            .await
            .unwrap();
        assert_eq!(svc.executor().executed(), vec![ix.clone()]);

        // Replayed claim is rejected and nothing new is dispatched.
        let err = svc
            .claim(&lock.to_hex(), secret.as_bytes(), Identity::new("bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, HtlcError::NotOpen { .. }));
        assert_eq!(svc.executor().executed().len(), 1);
    }

    #[tokio::test]
    async fn test_rejection_dispatches_nothing() {
        let svc = service();
        let secret = generate_random_secret();
        let lock = create_hash_lock(&secret);
        svc.initiate(request(&lock), Identity::new("alice"))
            .await
            .unwrap();

        let err = svc
            .refund(&lock.to_hex(), Identity::new("alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, HtlcError::NotYetExpired { .. }));
        assert!(svc.executor().executed().is_empty());
    }

    #[tokio::test]
    async fn test_refund_uses_clock() {
        let svc = service();
        let lock = create_hash_lock(&generate_random_secret());
        svc.initiate(request(&lock), Identity::new("alice"))
            .await
            .unwrap();

        svc.clock().set_time(T + 3700);
        let ix = svc
            .refund(&lock.to_hex(), Identity::new("alice"))
            .await
            .unwrap();
        assert_eq!(ix.reason, TransferReason::Refund);
        assert_eq!(svc.query(&lock.to_hex()).unwrap().resolved_at, Some(T + 3700));
    }

    #[tokio::test]
    async fn test_failed_transfer_keeps_swap_resolved() {
        let svc = service();
        let secret = generate_random_secret();
        let lock = create_hash_lock(&secret);
        svc.initiate(request(&lock), Identity::new("alice"))
            .await
            .unwrap();

        svc.executor().fail_next("ledger unavailable");
        let err = svc
            .claim(&lock.to_hex(), secret.as_bytes(), Identity::new("bob"))
            .await
            .unwrap_err();
        match err {
            HtlcError::TransferFailed {
                instruction,
                reason,
            } => {
                assert_eq!(instruction.to, Identity::new("bob"));
                assert!(reason.contains("ledger unavailable"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            svc.query(&lock.to_hex()).unwrap().status,
            SwapStatus::Claimed
        );
    }
}
