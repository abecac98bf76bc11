//! Lockout policy engine.
//!
//! Implements failure-streak based account lockout and origin ban. The
//! *failure streak* for a key is the count of attempts recorded after the
//! key's most recent success (or over its entire history if it has never
//! succeeded). One success resets the streak to zero regardless of elapsed
//! time; there is no sliding window.
//!
//! Lock and ban state is recomputed from the ledger on every call, so it
//! can never go stale and there is no flag to keep in sync.

use std::sync::Arc;

use crate::{AccountId, Error, LockoutConfig, repositories::LedgerRepository};

/// Service answering "is this account locked?" and "is this origin banned?"
///
/// # Thread Safety
///
/// This service is thread-safe and can be shared across multiple tasks.
/// Concurrent attempts interleave at the ledger level; each check sees
/// whatever records already have lower sequence ids.
pub struct LockoutService<L: LedgerRepository> {
    ledger: Arc<L>,
    config: LockoutConfig,
}

impl<L: LedgerRepository> LockoutService<L> {
    pub fn new(ledger: Arc<L>, config: LockoutConfig) -> Self {
        Self { ledger, config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &LockoutConfig {
        &self.config
    }

    /// Count of attempts for an account recorded after its most recent
    /// success; the whole history when it has never succeeded.
    pub async fn failure_streak_for_account(&self, account_id: AccountId) -> Result<u64, Error> {
        let last_success = self
            .ledger
            .last_account_success(account_id)
            .await?
            .unwrap_or(0);
        self.ledger
            .count_account_attempts_after(account_id, last_success)
            .await
    }

    /// Count of attempts from an origin recorded after its most recent
    /// success; the whole history when it has never succeeded.
    pub async fn failure_streak_for_origin(&self, origin: &str) -> Result<u64, Error> {
        let last_success = self.ledger.last_origin_success(origin).await?.unwrap_or(0);
        self.ledger
            .count_origin_attempts_after(origin, last_success)
            .await
    }

    /// True iff the account's failure streak has reached the account
    /// threshold.
    pub async fn is_account_locked(&self, account_id: AccountId) -> Result<bool, Error> {
        let streak = self.failure_streak_for_account(account_id).await?;
        Ok(streak >= u64::from(self.config.account_failure_threshold()))
    }

    /// True iff the origin's failure streak has reached the origin
    /// threshold.
    pub async fn is_origin_banned(&self, origin: &str) -> Result<bool, Error> {
        let streak = self.failure_streak_for_origin(origin).await?;
        Ok(streak >= u64::from(self.config.origin_failure_threshold()))
    }
}
