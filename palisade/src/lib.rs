//! # Palisade
//!
//! Palisade is a login engine that defends against credential-guessing
//! attacks. Every login attempt, successful or not, is appended to an
//! immutable ledger; whether an account is locked or an origin is banned
//! is always *derived* from that ledger and two failure-streak thresholds,
//! never stored, so lock state cannot go stale.
//!
//! The engine exposes four operations to the surrounding application
//! layer:
//! - [`Palisade::attempt_login`]: the one-shot login orchestrator
//! - [`Palisade::build_report`]: all currently locked accounts and banned
//!   origins, for an administrative report
//! - [`Palisade::is_account_locked_by_name`] and
//!   [`Palisade::is_origin_banned`]: per-key checks for display purposes
//!
//! Rendering, sessions, and the HTTP surface are the embedding
//! application's concern; palisade only decides and records.
//!
//! ## Storage Support
//!
//! Palisade currently ships a SQLite backend; any store implementing the
//! repository traits in `palisade_core::repositories` works.
//!
//! ## Example
//!
//! ```rust,no_run
//! use palisade::{Palisade, SqliteRepositoryProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
//!     let repositories = Arc::new(SqliteRepositoryProvider::new(pool));
//!
//!     let palisade = Palisade::new(repositories);
//!     palisade.migrate().await.unwrap();
//!
//!     let outcome = palisade
//!         .attempt_login("alice", "secret", "203.0.113.7")
//!         .await
//!         .unwrap();
//!     println!("{outcome:?}");
//! }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};

use palisade_core::{
    crypto,
    repositories::{
        AccountRepository, AccountRepositoryAdapter, LedgerRepositoryAdapter, RepositoryProvider,
    },
    services::{LoginService, ReportService},
};

/// Re-export core types from palisade_core
///
/// These types are commonly used when working with the Palisade API.
pub use palisade_core::{
    Account, AccountId, AttemptRecord, LockoutConfig, LockoutReport, LoginOutcome, NewAccount,
    RejectionReason,
};

/// Re-export storage backends
///
/// These storage implementations are available when the corresponding
/// feature is enabled.
#[cfg(feature = "sqlite")]
pub use palisade_storage_sqlite::SqliteRepositoryProvider;

/// Errors that can occur when using Palisade.
///
/// Expected login rejections (wrong secret, locked account, banned origin,
/// unknown login) are **not** errors: they are [`LoginOutcome`] values.
#[derive(Debug, thiserror::Error)]
pub enum PalisadeError {
    /// Error when interacting with storage
    #[error("Storage error: {0}")]
    Storage(String),
    /// Invalid configuration supplied at startup
    #[error("Config error: {0}")]
    Config(String),
}

impl From<palisade_core::Error> for PalisadeError {
    fn from(e: palisade_core::Error) -> Self {
        match e {
            palisade_core::Error::Storage(e) => PalisadeError::Storage(e.to_string()),
            palisade_core::Error::Config(e) => PalisadeError::Config(e.to_string()),
        }
    }
}

/// The main coordinator wiring services to a repository provider.
///
/// # Example
///
/// ```rust,no_run
/// use palisade::{Palisade, LockoutConfig, SqliteRepositoryProvider};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = sqlx::SqlitePool::connect("sqlite::memory:").await?;
///     let repositories = Arc::new(SqliteRepositoryProvider::new(pool));
///
///     let palisade = Palisade::new(repositories)
///         .with_lockout_config(LockoutConfig::new(3, 10)?);
///     palisade.migrate().await?;
///     Ok(())
/// }
/// ```
pub struct Palisade<R: RepositoryProvider> {
    repositories: Arc<R>,
    accounts: Arc<AccountRepositoryAdapter<R>>,
    login_service: LoginService<AccountRepositoryAdapter<R>, LedgerRepositoryAdapter<R>>,
    report_service: ReportService<LedgerRepositoryAdapter<R>>,
}

impl<R: RepositoryProvider> Palisade<R> {
    /// Create a new Palisade instance with the default lockout config
    /// (3 account failures, 10 origin failures).
    pub fn new(repositories: Arc<R>) -> Self {
        Self::with_config(repositories, LockoutConfig::default())
    }

    /// Replace the lockout configuration.
    ///
    /// An invalid config cannot reach this point: [`LockoutConfig::new`]
    /// rejects non-positive thresholds at startup.
    pub fn with_lockout_config(self, config: LockoutConfig) -> Self {
        Self::with_config(self.repositories, config)
    }

    /// Replace the time source used to stamp attempt records.
    ///
    /// Defaults to [`Utc::now`]. Ordering decisions never read the
    /// timestamp; this only affects the stored `created_at`.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.login_service = self.login_service.with_clock(clock);
        self
    }

    fn with_config(repositories: Arc<R>, config: LockoutConfig) -> Self {
        let accounts = Arc::new(AccountRepositoryAdapter::new(repositories.clone()));
        let ledger = Arc::new(LedgerRepositoryAdapter::new(repositories.clone()));

        let login_service = LoginService::new(accounts.clone(), ledger.clone(), config);
        let report_service = ReportService::new(ledger, config);

        Self {
            repositories,
            accounts,
            login_service,
            report_service,
        }
    }

    /// Run migrations for all repositories
    pub async fn migrate(&self) -> Result<(), PalisadeError> {
        self.repositories.migrate().await.map_err(Into::into)
    }

    /// Health check for all repositories
    pub async fn health_check(&self) -> Result<(), PalisadeError> {
        self.repositories.health_check().await.map_err(Into::into)
    }

    /// Create an account with a freshly generated salt (seeding).
    ///
    /// The secret is never stored; only its salted digest is.
    pub async fn create_account(
        &self,
        login: &str,
        secret: &str,
    ) -> Result<Account, PalisadeError> {
        let salt: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        let password_hash = crypto::hash_secret(secret, &salt);

        let account = self
            .accounts
            .create(NewAccount::new(login, password_hash, salt))
            .await?;
        tracing::info!(login = %login, id = %account.id, "created account");
        Ok(account)
    }

    /// Get an account by its ID
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>, PalisadeError> {
        self.accounts.find_by_id(id).await.map_err(Into::into)
    }

    /// Get an account by its login name
    pub async fn get_account_by_login(
        &self,
        login: &str,
    ) -> Result<Option<Account>, PalisadeError> {
        self.accounts.find_by_login(login).await.map_err(Into::into)
    }

    /// Attempt to authenticate `login` with `secret` from `origin`.
    ///
    /// Sequences ban check, lock check, and credential check, appends
    /// exactly one ledger record, and returns the resulting
    /// [`LoginOutcome`]. A ledger write failure surfaces as
    /// [`PalisadeError::Storage`], not as a rejection, since the attempt
    /// was not durably recorded.
    pub async fn attempt_login(
        &self,
        login: &str,
        secret: &str,
        origin: &str,
    ) -> Result<LoginOutcome, PalisadeError> {
        self.login_service
            .attempt_login(login, secret, origin)
            .await
            .map_err(Into::into)
    }

    /// Whether the account behind a login name is currently locked.
    /// A login name that matches no account is never locked.
    pub async fn is_account_locked_by_name(&self, login: &str) -> Result<bool, PalisadeError> {
        self.login_service
            .is_account_locked_by_name(login)
            .await
            .map_err(Into::into)
    }

    /// Whether an origin is currently banned.
    pub async fn is_origin_banned(&self, origin: &str) -> Result<bool, PalisadeError> {
        self.login_service
            .is_origin_banned(origin)
            .await
            .map_err(Into::into)
    }

    /// The success preceding the account's current session, for "last
    /// login" display.
    pub async fn last_successful_login(
        &self,
        account_id: AccountId,
    ) -> Result<Option<AttemptRecord>, PalisadeError> {
        self.login_service
            .last_successful_login(account_id)
            .await
            .map_err(Into::into)
    }

    /// Compute the administrative report: all currently locked account
    /// logins and all currently banned origins.
    pub async fn build_report(&self) -> Result<LockoutReport, PalisadeError> {
        self.report_service.build_report().await.map_err(Into::into)
    }
}
