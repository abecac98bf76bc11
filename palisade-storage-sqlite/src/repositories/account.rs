//! SQLite implementation of the account repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use palisade_core::{
    Account, AccountId, Error, NewAccount, error::StorageError,
    repositories::AccountRepository,
};

pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Internal struct for query results
#[derive(Debug, sqlx::FromRow)]
struct SqliteAccount {
    id: i64,
    login: String,
    password_hash: String,
    salt: String,
}

impl From<SqliteAccount> for Account {
    fn from(row: SqliteAccount) -> Self {
        Account {
            id: AccountId::new(row.id),
            login: row.login,
            password_hash: row.password_hash,
            salt: row.salt,
        }
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        let row = sqlx::query_as::<_, SqliteAccount>(
            r#"
            INSERT INTO accounts (login, password_hash, salt)
            VALUES (?1, ?2, ?3)
            RETURNING id, login, password_hash, salt
            "#,
        )
        .bind(&account.login)
        .bind(&account.password_hash)
        .bind(&account.salt)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create account");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error> {
        let row = sqlx::query_as::<_, SqliteAccount>(
            "SELECT id, login, password_hash, salt FROM accounts WHERE id = ?1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(row.map(|a| a.into()))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, Error> {
        let row = sqlx::query_as::<_, SqliteAccount>(
            "SELECT id, login, password_hash, salt FROM accounts WHERE login = ?1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(row.map(|a| a.into()))
    }
}
