//! In-memory swap store.

use crate::domain::{StoreError, Swap, SwapId};
use crate::ports::SwapStore;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
struct Tables {
    records: HashMap<SwapId, Swap>,
    index: Vec<SwapId>,
}

/// In-memory implementation of SwapStore.
///
/// Records and the enumeration index live behind one lock so an insert is
/// never half-applied.
#[derive(Default)]
pub struct InMemorySwapStore {
    tables: RwLock<Tables>,
}

impl InMemorySwapStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing records in index order.
    pub fn from_records(records: Vec<Swap>) -> Result<Self, StoreError> {
        let store = Self::new();
        for swap in records {
            store.insert(swap)?;
        }
        Ok(store)
    }

    /// All records in index order.
    pub fn snapshot(&self) -> Vec<Swap> {
        let tables = self.tables.read();
        tables
            .index
            .iter()
            .filter_map(|id| tables.records.get(id).cloned())
            .collect()
    }
}

impl SwapStore for InMemorySwapStore {
    fn get(&self, id: &SwapId) -> Result<Option<Swap>, StoreError> {
        Ok(self.tables.read().records.get(id).cloned())
    }

    fn contains(&self, id: &SwapId) -> Result<bool, StoreError> {
        Ok(self.tables.read().records.contains_key(id))
    }

    fn insert(&self, swap: Swap) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if tables.records.contains_key(&swap.id) {
            return Err(StoreError::Duplicate(swap.id));
        }
        tables.index.push(swap.id);
        tables.records.insert(swap.id, swap);
        Ok(())
    }

    fn update(&self, swap: Swap) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        match tables.records.get_mut(&swap.id) {
            Some(slot) => {
                *slot = swap;
                Ok(())
            }
            None => Err(StoreError::Missing(swap.id)),
        }
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.tables.read().index.len())
    }

    fn index_range(&self, offset: usize, count: usize) -> Result<Vec<SwapId>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .index
            .iter()
            .skip(offset)
            .take(count)
            .copied()
            .collect())
    }
}
