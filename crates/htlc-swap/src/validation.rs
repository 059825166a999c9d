//! # Request Validation
//!
//! Pure format and business-rule checks run before the store is touched.
//! Caller identities are not checked here: the host authenticates them.

use crate::domain::{
    HtlcConfig, HtlcError, SecureSecret, SwapId, Timestamp, SECRET_LEN, SWAP_ID_LEN,
};

/// Parse a commitment identifier: exactly 64 hex characters.
pub fn parse_commitment(raw: &str) -> Result<SwapId, HtlcError> {
    if raw.len() != SWAP_ID_LEN * 2 {
        return Err(HtlcError::InvalidCommitment {
            reason: format!("expected {} hex characters, got {}", SWAP_ID_LEN * 2, raw.len()),
        });
    }
    let mut bytes = [0u8; SWAP_ID_LEN];
    hex::decode_to_slice(raw, &mut bytes).map_err(|e| HtlcError::InvalidCommitment {
        reason: e.to_string(),
    })?;
    Ok(SwapId::new(bytes))
}

/// Check the preimage length and take ownership of it.
pub fn validate_secret(secret: &[u8]) -> Result<SecureSecret, HtlcError> {
    SecureSecret::from_slice(secret).ok_or(HtlcError::InvalidSecretLength {
        expected: SECRET_LEN,
        got: secret.len(),
    })
}

/// Amount must be strictly above the dust floor.
pub fn validate_amount(amount: u128, config: &HtlcConfig) -> Result<(), HtlcError> {
    if amount == 0 || amount <= config.min_amount {
        return Err(HtlcError::InsufficientAmount {
            amount,
            minimum: config.min_amount,
        });
    }
    Ok(())
}

/// Expiration must be strictly after `now`.
pub fn validate_expiration(expiration: Timestamp, now: Timestamp) -> Result<(), HtlcError> {
    if expiration <= now {
        return Err(HtlcError::ExpirationNotInFuture { expiration, now });
    }
    Ok(())
}

/// Effective page size: the default when unset, never 0, never above the cap.
pub fn clamp_limit(requested: Option<usize>, config: &HtlcConfig) -> usize {
    requested
        .unwrap_or(config.default_list_limit)
        .clamp(1, config.max_list_limit)
}
