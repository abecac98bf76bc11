//! Login orchestrator.
//!
//! One shot per call, no persisted state of its own: look the account up,
//! consult the lockout engine, verify the credential, and append exactly
//! one ledger record before returning. A failed append is surfaced as a
//! storage error rather than a rejection, since the attempt was not
//! durably recorded.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Account, AccountId, AttemptRecord, Error, LockoutConfig, NewAttempt, crypto,
    repositories::{AccountRepository, LedgerRepository},
    services::LockoutService,
};

/// Why a login attempt was rejected.
///
/// These are expected, user-facing outcomes, not errors. The ban check runs
/// before the account lookup result is consulted, so a banned origin learns
/// nothing about whether the login name exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The origin's failure streak reached the origin threshold.
    OriginBanned,
    /// The account's failure streak reached the account threshold.
    AccountLocked,
    /// The account exists but the secret did not verify.
    WrongSecret,
    /// The submitted login name matched no account.
    UnknownLogin,
}

/// The tagged result of one login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(Account),
    Rejected(RejectionReason),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success(_))
    }
}

/// Service sequencing ban check, lock check, credential check, and the
/// ledger write.
pub struct LoginService<A: AccountRepository, L: LedgerRepository> {
    accounts: Arc<A>,
    ledger: Arc<L>,
    lockout: LockoutService<L>,
    clock: fn() -> DateTime<Utc>,
}

impl<A: AccountRepository, L: LedgerRepository> LoginService<A, L> {
    pub fn new(accounts: Arc<A>, ledger: Arc<L>, config: LockoutConfig) -> Self {
        let lockout = LockoutService::new(ledger.clone(), config);
        Self {
            accounts,
            ledger,
            lockout,
            clock: Utc::now,
        }
    }

    /// Replace the time source used to stamp appended records.
    ///
    /// Ordering decisions never read the timestamp; this only affects the
    /// stored `created_at`.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Attempt to authenticate `login` with `secret` from `origin`.
    ///
    /// Every branch appends exactly one attempt record; there is no outcome
    /// that leaves the attempt unrecorded. The ban check strictly precedes
    /// the lock check: a banned origin is reported as banned even when the
    /// targeted account is independently locked or does not exist.
    pub async fn attempt_login(
        &self,
        login: &str,
        secret: &str,
        origin: &str,
    ) -> Result<LoginOutcome, Error> {
        let account = self.accounts.find_by_login(login).await?;
        let now = (self.clock)();

        if self.lockout.is_origin_banned(origin).await? {
            self.ledger
                .append(NewAttempt::failure(
                    account.as_ref().map(|a| a.id),
                    login,
                    origin,
                    now,
                ))
                .await?;
            tracing::debug!(origin = %origin, "login rejected: origin banned");
            return Ok(LoginOutcome::Rejected(RejectionReason::OriginBanned));
        }

        let Some(account) = account else {
            self.ledger
                .append(NewAttempt::failure(None, login, origin, now))
                .await?;
            return Ok(LoginOutcome::Rejected(RejectionReason::UnknownLogin));
        };

        if self.lockout.is_account_locked(account.id).await? {
            self.ledger
                .append(NewAttempt::failure(Some(account.id), login, origin, now))
                .await?;
            tracing::debug!(login = %login, "login rejected: account locked");
            return Ok(LoginOutcome::Rejected(RejectionReason::AccountLocked));
        }

        if crypto::verify_secret(secret, &account) {
            self.ledger
                .append(NewAttempt::success(account.id, login, origin, now))
                .await?;
            return Ok(LoginOutcome::Success(account));
        }

        self.ledger
            .append(NewAttempt::failure(Some(account.id), login, origin, now))
            .await?;
        Ok(LoginOutcome::Rejected(RejectionReason::WrongSecret))
    }

    /// Check whether the account behind a login name is currently locked.
    ///
    /// A login name that matches no account is never locked.
    pub async fn is_account_locked_by_name(&self, login: &str) -> Result<bool, Error> {
        match self.accounts.find_by_login(login).await? {
            Some(account) => self.lockout.is_account_locked(account.id).await,
            None => Ok(false),
        }
    }

    /// Check whether an origin is currently banned.
    pub async fn is_origin_banned(&self, origin: &str) -> Result<bool, Error> {
        self.lockout.is_origin_banned(origin).await
    }

    /// The success preceding the account's current session, for "last
    /// login" display: the older of the two most recent successes, or the
    /// only success when there is just one.
    pub async fn last_successful_login(
        &self,
        account_id: AccountId,
    ) -> Result<Option<AttemptRecord>, Error> {
        let mut successes = self.ledger.recent_account_successes(account_id, 2).await?;
        Ok(successes.pop())
    }
}
