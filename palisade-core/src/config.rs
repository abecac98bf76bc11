//! Lockout policy configuration
//!
//! Two thresholds, constant for the process lifetime and validated at
//! startup. The fields are private so a non-positive threshold can never
//! reach the policy engine.

use crate::error::{ConfigError, Error};

/// Failure-streak thresholds for account lockout and origin ban.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutConfig {
    account_failure_threshold: u32,
    origin_failure_threshold: u32,
}

impl LockoutConfig {
    /// Create a config, validating that both thresholds are at least 1.
    ///
    /// A zero threshold would lock every account and ban every origin
    /// before any attempt was made, so it is rejected at startup rather
    /// than surfacing at request time.
    pub fn new(account_failure_threshold: u32, origin_failure_threshold: u32) -> Result<Self, Error> {
        if account_failure_threshold < 1 {
            return Err(ConfigError::NonPositiveThreshold("account_failure_threshold").into());
        }
        if origin_failure_threshold < 1 {
            return Err(ConfigError::NonPositiveThreshold("origin_failure_threshold").into());
        }
        Ok(Self {
            account_failure_threshold,
            origin_failure_threshold,
        })
    }

    /// Consecutive failures after which an account is locked.
    pub fn account_failure_threshold(&self) -> u32 {
        self.account_failure_threshold
    }

    /// Consecutive failures after which an origin is banned.
    pub fn origin_failure_threshold(&self) -> u32 {
        self.origin_failure_threshold
    }
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            account_failure_threshold: 3,
            origin_failure_threshold: 10,
        }
    }
}
