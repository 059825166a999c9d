//! # Outbound Ports
//!
//! What the swap core needs from its host: storage, a clock, and a way to
//! move custody.

use crate::domain::{HtlcError, StoreError, Swap, SwapId, Timestamp, TransferInstruction};
use async_trait::async_trait;

/// Keyed swap storage with an enumeration index in creation order.
///
/// Implementations must give read-after-write consistency per key and must
/// apply `insert` (record + index) all-or-nothing.
pub trait SwapStore: Send + Sync {
    /// Fetch a record.
    fn get(&self, id: &SwapId) -> Result<Option<Swap>, StoreError>;

    /// Whether a record with this id was ever stored.
    fn contains(&self, id: &SwapId) -> Result<bool, StoreError> {
        Ok(self.get(id)?.is_some())
    }

    /// Store a new record and append it to the index.
    ///
    /// Fails with [`StoreError::Duplicate`] if the id is taken.
    fn insert(&self, swap: Swap) -> Result<(), StoreError>;

    /// Replace an existing record. The index is unchanged.
    ///
    /// Fails with [`StoreError::Missing`] if the id was never inserted.
    fn update(&self, swap: Swap) -> Result<(), StoreError>;

    /// Number of index entries.
    fn len(&self) -> Result<usize, StoreError>;

    /// Whether the store holds no records.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Up to `count` index entries starting at position `offset`.
    fn index_range(&self, offset: usize, count: usize) -> Result<Vec<SwapId>, StoreError>;
}

/// Host clock.
pub trait Clock: Send + Sync {
    /// Current host time in seconds.
    fn now(&self) -> Timestamp;
}

/// Host custody mover.
///
/// Called once per committed claim or refund, never before commit.
#[async_trait]
pub trait TransferExecutor: Send + Sync {
    /// Move `instruction.amount` to `instruction.to`.
    async fn execute(&self, instruction: &TransferInstruction) -> Result<(), HtlcError>;
}
