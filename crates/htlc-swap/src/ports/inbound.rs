//! # Inbound Ports
//!
//! API trait defining what the swap core can do for a host adapter.

use crate::domain::{
    HtlcError, Identity, ListQuery, SwapId, SwapPage, SwapView, Timestamp, TransferInstruction,
};
use async_trait::async_trait;

/// Request for [`HtlcApi::initiate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitiateRequest {
    /// Hashlock as 64 hex characters; becomes the swap id.
    pub hash_lock: String,
    /// Designated claimer, or `None` for "whoever knows the secret".
    pub recipient: Option<Identity>,
    /// Absolute expiration.
    pub expiration: Timestamp,
    /// Amount escrowed by the caller.
    pub amount: u128,
}

/// HTLC API - inbound port.
///
/// `caller` is always the host-authenticated identity of the request.
#[async_trait]
pub trait HtlcApi: Send + Sync {
    /// Open a new swap funded by `caller`.
    async fn initiate(
        &self,
        request: InitiateRequest,
        caller: Identity,
    ) -> Result<SwapId, HtlcError>;

    /// Claim an open swap with its preimage.
    async fn claim(
        &self,
        hash_lock: &str,
        secret: &[u8],
        caller: Identity,
    ) -> Result<TransferInstruction, HtlcError>;

    /// Refund an expired swap to its sender.
    async fn refund(
        &self,
        hash_lock: &str,
        caller: Identity,
    ) -> Result<TransferInstruction, HtlcError>;

    /// Read one swap.
    fn query(&self, hash_lock: &str) -> Result<SwapView, HtlcError>;

    /// Enumerate swaps in creation order.
    fn list(&self, query: ListQuery) -> Result<SwapPage, HtlcError>;
}
