//! # Domain Value Objects
//!
//! Immutable value types for the swap core.

use super::errors::Hash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host timestamp in seconds.
pub type Timestamp = u64;

/// Length of a commitment identifier in bytes.
pub const SWAP_ID_LEN: usize = 32;

/// Commitment identifier. Equal to the swap's hashlock.
///
/// Serialized and displayed as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwapId(Hash);

impl SwapId {
    /// Wrap raw digest bytes.
    pub const fn new(bytes: Hash) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<Hash> for SwapId {
    fn from(bytes: Hash) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SwapId({})", self.to_hex())
    }
}

impl Serialize for SwapId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SwapId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        crate::validation::parse_commitment(&s).map_err(serde::de::Error::custom)
    }
}

/// Caller identity as authenticated by the host.
///
/// Opaque to the core: an account name on one ledger, a hex address on another.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap a host-supplied identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Swap state machine.
///
/// `Open -> Claimed` and `Open -> Refunded` are the only transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapStatus {
    /// Funds escrowed, awaiting claim or expiry.
    #[default]
    Open,
    /// Secret revealed, funds released to the claimer.
    Claimed,
    /// Expired and returned to the sender.
    Refunded,
}

impl SwapStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: SwapStatus) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Claimed) | (Self::Open, Self::Refunded)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Claimed | Self::Refunded)
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "Open",
            Self::Claimed => "Claimed",
            Self::Refunded => "Refunded",
        };
        f.write_str(s)
    }
}

/// Why a transfer instruction was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferReason {
    /// Release to the claimer.
    Claim,
    /// Return to the sender.
    Refund,
}

/// Enumeration request for `list`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Only return swaps in this status.
    pub status: Option<SwapStatus>,
    /// Requested page size; clamped by config.
    pub limit: Option<usize>,
    /// Index position to resume from (from a previous page).
    pub cursor: Option<usize>,
}

impl ListQuery {
    /// All swaps, default page size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status.
    pub fn with_status(mut self, status: SwapStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Requested page size.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume from a cursor.
    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }
}
