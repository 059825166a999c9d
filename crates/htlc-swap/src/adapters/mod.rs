//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports: swap stores, clocks and a
//! recording transfer executor.

mod clock;
mod file_store;
mod memory_store;
mod transfer;

pub use clock::{ManualClock, SystemClock};
pub use file_store::JsonFileSwapStore;
pub use memory_store::InMemorySwapStore;
pub use transfer::RecordingTransferExecutor;
