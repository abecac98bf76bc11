//! Repository traits for the data access layer
//!
//! Services interact with storage exclusively through these traits.
//!
//! The repository system uses a composable trait hierarchy:
//!
//! - Individual `*Repository` traits define the operations for each data
//!   domain (accounts, the attempt ledger)
//! - Individual `*RepositoryProvider` traits provide access to each
//!   repository type
//! - [`RepositoryProvider`] is a supertrait combining all provider traits
//!   plus lifecycle methods
//!
//! Backends implement the repositories against whatever store satisfies
//! the ledger read shapes; the [`adapter`] module lets services stay
//! generic over a single repository trait while being backed by a full
//! provider.

pub mod account;
pub mod adapter;
pub mod ledger;

pub use account::AccountRepository;
pub use adapter::{AccountRepositoryAdapter, LedgerRepositoryAdapter};
pub use ledger::{AccountLastSuccess, LedgerRepository, OriginLastSuccess};

use async_trait::async_trait;

use crate::Error;

/// Provider trait for account repository access.
pub trait AccountRepositoryProvider: Send + Sync + 'static {
    /// The account repository implementation type
    type AccountRepo: AccountRepository;

    /// Get the account repository
    fn account(&self) -> &Self::AccountRepo;
}

/// Provider trait for attempt ledger access.
pub trait LedgerRepositoryProvider: Send + Sync + 'static {
    /// The ledger repository implementation type
    type LedgerRepo: LedgerRepository;

    /// Get the ledger repository
    fn ledger(&self) -> &Self::LedgerRepo;
}

/// Provider trait that storage implementations must implement to provide
/// all repositories, plus lifecycle methods for migrations and health
/// checks.
#[async_trait]
pub trait RepositoryProvider: AccountRepositoryProvider + LedgerRepositoryProvider {
    /// Run migrations for all repositories
    async fn migrate(&self) -> Result<(), Error>;

    /// Health check for all repositories
    async fn health_check(&self) -> Result<(), Error>;
}
