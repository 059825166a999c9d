//! Swap core configuration and validation
//!
//! # Example
//!
//! ```
//! use htlc_swap::HtlcConfig;
//!
//! let config = HtlcConfig::default()
//!     .with_min_amount(10_000)
//!     .with_max_list_limit(50);
//! assert!(config.validate().is_ok());
//! ```

use super::errors::HtlcError;
use serde::{Deserialize, Serialize};

/// Default dust floor in the host's smallest unit.
pub const DEFAULT_MIN_AMOUNT: u128 = 1_000;

/// Default hard cap on `list` page size.
pub const DEFAULT_MAX_LIST_LIMIT: usize = 100;

/// Minimum responder safety margin (6 hours).
pub const MIN_TIMELOCK_MARGIN_SECS: u64 = 6 * 3600;

/// Swap core configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtlcConfig {
    /// Smallest amount `initiate` accepts.
    pub min_amount: u128,
    /// Hard cap on `list` page size.
    pub max_list_limit: usize,
    /// Page size when the caller gives none.
    pub default_list_limit: usize,
    /// Index entries examined per `list` call.
    pub max_list_scan: usize,
    /// Required gap between the responder's and initiator's expirations.
    pub min_timelock_margin_secs: u64,
}

impl Default for HtlcConfig {
    fn default() -> Self {
        Self {
            min_amount: DEFAULT_MIN_AMOUNT,
            max_list_limit: DEFAULT_MAX_LIST_LIMIT,
            default_list_limit: 20,
            max_list_scan: 1_000,
            min_timelock_margin_secs: MIN_TIMELOCK_MARGIN_SECS,
        }
    }
}

impl HtlcConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate internal consistency.
    pub fn validate(&self) -> Result<(), HtlcError> {
        if self.min_amount == 0 {
            return Err(HtlcError::InvalidConfig(
                "min_amount must be at least 1".to_string(),
            ));
        }
        if self.max_list_limit == 0 {
            return Err(HtlcError::InvalidConfig(
                "max_list_limit cannot be 0".to_string(),
            ));
        }
        if self.default_list_limit == 0 || self.default_list_limit > self.max_list_limit {
            return Err(HtlcError::InvalidConfig(format!(
                "default_list_limit must be in 1..={}",
                self.max_list_limit
            )));
        }
        if self.max_list_scan < self.max_list_limit {
            return Err(HtlcError::InvalidConfig(format!(
                "max_list_scan ({}) must be >= max_list_limit ({})",
                self.max_list_scan, self.max_list_limit
            )));
        }
        Ok(())
    }

    /// Load from `HTLC_*` environment variables on top of defaults.
    pub fn from_env() -> Result<Self, HtlcError> {
        let mut config = Self::default();

        if let Some(v) = read_env("HTLC_MIN_AMOUNT")? {
            config.min_amount = v;
        }
        if let Some(v) = read_env("HTLC_MAX_LIST_LIMIT")? {
            config.max_list_limit = v;
        }
        if let Some(v) = read_env("HTLC_DEFAULT_LIST_LIMIT")? {
            config.default_list_limit = v;
        }
        if let Some(v) = read_env("HTLC_MAX_LIST_SCAN")? {
            config.max_list_scan = v;
        }
        if let Some(v) = read_env("HTLC_MIN_TIMELOCK_MARGIN_SECS")? {
            config.min_timelock_margin_secs = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the dust floor.
    pub fn with_min_amount(mut self, amount: u128) -> Self {
        self.min_amount = amount;
        self
    }

    /// Set the page-size cap.
    pub fn with_max_list_limit(mut self, limit: usize) -> Self {
        self.max_list_limit = limit;
        if self.default_list_limit > limit {
            self.default_list_limit = limit;
        }
        self
    }

    /// Set the per-call scan cap.
    pub fn with_max_list_scan(mut self, scan: usize) -> Self {
        self.max_list_scan = scan;
        self
    }

    /// Set the responder safety margin.
    pub fn with_min_timelock_margin(mut self, secs: u64) -> Self {
        self.min_timelock_margin_secs = secs;
        self
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, HtlcError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| HtlcError::InvalidConfig(format!("{key}: cannot parse {raw:?}"))),
        Err(_) => Ok(None),
    }
}
