//! Repository trait for the append-only attempt ledger.
//!
//! The ledger is the sole source of truth for lock and ban state. This
//! trait exposes exactly the read shapes the policy engine and the report
//! builder need; implementations should index them, since the point reads
//! run on every login attempt.

use async_trait::async_trait;

use crate::{AccountId, AttemptRecord, Error, NewAttempt};

/// Per-account aggregate for the report's second step: the highest
/// sequence id among the account's successful attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLastSuccess {
    pub account_id: AccountId,
    pub login: String,
    pub last_success_id: i64,
}

/// Per-origin aggregate for the report's second step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginLastSuccess {
    pub origin: String,
    pub last_success_id: i64,
}

/// Repository for the attempt ledger.
///
/// Append-only: no method updates or deletes records, and none may be
/// added. The store assigns sequence ids monotonically with no duplicates,
/// even under concurrent appends; that assignment is the only cross-request
/// ordering guarantee the engine relies on.
#[async_trait]
pub trait LedgerRepository: Send + Sync + 'static {
    /// Append an attempt and return the stored record with its assigned
    /// sequence id.
    ///
    /// Fails only when the store is unavailable; the caller treats that as
    /// a fatal request failure since the attempt was not durably recorded.
    async fn append(&self, attempt: NewAttempt) -> Result<AttemptRecord, Error>;

    /// The highest sequence id among successful attempts for an account,
    /// or `None` if the account has never succeeded.
    async fn last_account_success(&self, account_id: AccountId) -> Result<Option<i64>, Error>;

    /// Count of attempts for an account with sequence id strictly greater
    /// than `after_id`.
    async fn count_account_attempts_after(
        &self,
        account_id: AccountId,
        after_id: i64,
    ) -> Result<u64, Error>;

    /// The highest sequence id among successful attempts from an origin,
    /// or `None` if the origin has never succeeded.
    async fn last_origin_success(&self, origin: &str) -> Result<Option<i64>, Error>;

    /// Count of attempts from an origin with sequence id strictly greater
    /// than `after_id`.
    async fn count_origin_attempts_after(&self, origin: &str, after_id: i64)
    -> Result<u64, Error>;

    /// Login names of accounts that have never succeeded and have at least
    /// `min_attempts` recorded attempts.
    async fn accounts_never_succeeded(&self, min_attempts: u32) -> Result<Vec<String>, Error>;

    /// For every account with at least one success, the highest successful
    /// sequence id.
    async fn account_last_successes(&self) -> Result<Vec<AccountLastSuccess>, Error>;

    /// Origins that have never succeeded and have at least `min_attempts`
    /// recorded attempts.
    async fn origins_never_succeeded(&self, min_attempts: u32) -> Result<Vec<String>, Error>;

    /// For every origin with at least one success, the highest successful
    /// sequence id.
    async fn origin_last_successes(&self) -> Result<Vec<OriginLastSuccess>, Error>;

    /// The most recent successful attempts for an account, newest first,
    /// at most `limit` records. Used for "last login" display.
    async fn recent_account_successes(
        &self,
        account_id: AccountId,
        limit: u32,
    ) -> Result<Vec<AttemptRecord>, Error>;
}
