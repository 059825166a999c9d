//! JSON snapshot swap store.

use super::memory_store::InMemorySwapStore;
use crate::domain::{StoreError, Swap, SwapId, SwapStatus};
use crate::ports::SwapStore;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    /// Records in index order.
    swaps: Vec<Swap>,
}

/// File-backed swap store.
///
/// Keeps every record in memory and rewrites a JSON snapshot on each
/// mutation (temp file, fsync, rename). The snapshot is written before the
/// in-memory tables change, so a failed write leaves the store as it was.
pub struct JsonFileSwapStore {
    cache: InMemorySwapStore,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSwapStore {
    /// Open the snapshot at `path`, or start empty if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let swaps = match std::fs::read(&path) {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                if snapshot.version != SNAPSHOT_VERSION {
                    return Err(StoreError::Corrupt(format!(
                        "unsupported snapshot version {}",
                        snapshot.version
                    )));
                }
                for swap in &snapshot.swaps {
                    check_record(swap)?;
                }
                info!(
                    path = %path.display(),
                    records = snapshot.swaps.len(),
                    "[htlc] loaded swap snapshot"
                );
                snapshot.swaps
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "[htlc] no swap snapshot, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let cache = InMemorySwapStore::from_records(swaps).map_err(|e| match e {
            StoreError::Duplicate(id) => {
                StoreError::Corrupt(format!("duplicate record {id} in snapshot"))
            }
            other => other,
        })?;

        Ok(Self {
            cache,
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Snapshot location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn persist(&self, swaps: Vec<Swap>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            swaps,
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        let temp_path = self.temp_path();
        let result = write_and_rename(&temp_path, &self.path, &bytes);
        if result.is_err() {
            // Best effort; the write error is what the caller needs.
            let _ = std::fs::remove_file(&temp_path);
        }
        result
    }

    fn persist_or_warn(&self, swaps: Vec<Swap>, id: &SwapId) -> Result<(), StoreError> {
        self.persist(swaps).inspect_err(|e| {
            warn!(swap_id = %id, error = %e, "[htlc] snapshot write failed, change discarded");
        })
    }
}

fn write_and_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    use std::io::Write;

    let mut file = std::fs::File::create(temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

/// Reject records that could not have been produced by the state machine.
fn check_record(swap: &Swap) -> Result<(), StoreError> {
    if swap.id != swap.hash_lock {
        return Err(StoreError::Corrupt(format!(
            "record {} has a different hashlock",
            swap.id
        )));
    }
    if swap.amount == 0 || swap.expiration <= swap.created_at {
        return Err(StoreError::Corrupt(format!(
            "record {} violates amount/expiration invariants",
            swap.id
        )));
    }
    let claimed = swap.status == SwapStatus::Claimed;
    if claimed != swap.revealed_secret.is_some() {
        return Err(StoreError::Corrupt(format!(
            "record {} secret does not match status {}",
            swap.id, swap.status
        )));
    }
    if swap.status.is_terminal() != swap.resolved_at.is_some() {
        return Err(StoreError::Corrupt(format!(
            "record {} resolution does not match status {}",
            swap.id, swap.status
        )));
    }
    Ok(())
}

impl SwapStore for JsonFileSwapStore {
    fn get(&self, id: &SwapId) -> Result<Option<Swap>, StoreError> {
        self.cache.get(id)
    }

    fn contains(&self, id: &SwapId) -> Result<bool, StoreError> {
        self.cache.contains(id)
    }

    fn insert(&self, swap: Swap) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        if self.cache.contains(&swap.id)? {
            return Err(StoreError::Duplicate(swap.id));
        }

        let mut swaps = self.cache.snapshot();
        swaps.push(swap.clone());
        self.persist_or_warn(swaps, &swap.id)?;

        self.cache.insert(swap)
    }

    fn update(&self, swap: Swap) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut swaps = self.cache.snapshot();
        let slot = swaps
            .iter_mut()
            .find(|s| s.id == swap.id)
            .ok_or(StoreError::Missing(swap.id))?;
        *slot = swap.clone();
        self.persist_or_warn(swaps, &swap.id)?;

        self.cache.update(swap)
    }

    fn len(&self) -> Result<usize, StoreError> {
        self.cache.len()
    }

    fn index_range(&self, offset: usize, count: usize) -> Result<Vec<SwapId>, StoreError> {
        self.cache.index_range(offset, count)
    }
}
