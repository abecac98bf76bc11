//! Repository implementations for SQLite storage

pub mod account;
pub mod ledger;

pub use account::SqliteAccountRepository;
pub use ledger::SqliteLedgerRepository;

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

use palisade_core::{
    Error,
    error::StorageError,
    repositories::{AccountRepositoryProvider, LedgerRepositoryProvider, RepositoryProvider},
};

/// Repository provider implementation for SQLite
///
/// Implements the individual repository provider traits as well as the
/// unified [`RepositoryProvider`] trait.
pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    account: Arc<SqliteAccountRepository>,
    ledger: Arc<SqliteLedgerRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        let account = Arc::new(SqliteAccountRepository::new(pool.clone()));
        let ledger = Arc::new(SqliteLedgerRepository::new(pool.clone()));

        Self {
            pool,
            account,
            ledger,
        }
    }
}

impl AccountRepositoryProvider for SqliteRepositoryProvider {
    type AccountRepo = SqliteAccountRepository;

    fn account(&self) -> &Self::AccountRepo {
        &self.account
    }
}

impl LedgerRepositoryProvider for SqliteRepositoryProvider {
    type LedgerRepo = SqliteLedgerRepository;

    fn ledger(&self) -> &Self::LedgerRepo {
        &self.ledger
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        use crate::migrations::{SqliteMigrationManager, all_migrations};

        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize migrations");
            Error::Storage(StorageError::Migration(
                "Failed to initialize migrations".to_string(),
            ))
        })?;

        manager.up(&all_migrations()).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            Error::Storage(StorageError::Migration(
                "Failed to run migrations".to_string(),
            ))
        })?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Connection(e.to_string())))?;
        Ok(())
    }
}
