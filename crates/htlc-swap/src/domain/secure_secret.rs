//! # Secure Secret Type
//!
//! Wrapper for swap preimages that zeroizes memory on drop.
//!
//! A secret is private until the claim that reveals it commits. Until then it
//! must not linger in memory or leak through `Debug` output in logs.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Required preimage length in bytes.
pub const SECRET_LEN: usize = 32;

/// A secure secret that zeroizes on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureSecret {
    inner: [u8; SECRET_LEN],
}

impl SecureSecret {
    /// Create a new secure secret from bytes.
    pub fn new(bytes: [u8; SECRET_LEN]) -> Self {
        Self { inner: bytes }
    }

    /// Create from a slice (copies into fixed array).
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != SECRET_LEN {
            return None;
        }
        let mut inner = [0u8; SECRET_LEN];
        inner.copy_from_slice(slice);
        Some(Self { inner })
    }

    /// Get the secret bytes.
    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.inner
    }

    /// Lowercase hex encoding (for publishing a revealed secret).
    pub fn to_hex(&self) -> String {
        hex::encode(self.inner)
    }
}

impl PartialEq for SecureSecret {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for SecureSecret {}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureSecret(***)")
    }
}

impl Serialize for SecureSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SecureSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Self::from_slice(&bytes).ok_or_else(|| serde::de::Error::custom("invalid secret length"))
    }
}
