//! SQLite implementation of the attempt ledger repository.
//!
//! The `login_attempts` table only ever sees `INSERT` and `SELECT`; the
//! rowid doubles as the monotonically increasing sequence id.

use async_trait::async_trait;
use chrono::DateTime;
use sqlx::SqlitePool;

use palisade_core::{
    AccountId, AttemptRecord, Error, NewAttempt, error::StorageError,
    repositories::{AccountLastSuccess, LedgerRepository, OriginLastSuccess},
};

pub struct SqliteLedgerRepository {
    pool: SqlitePool,
}

impl SqliteLedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Internal struct for query results
#[derive(Debug, sqlx::FromRow)]
struct SqliteAttempt {
    id: i64,
    account_id: Option<i64>,
    login: String,
    origin: String,
    succeeded: bool,
    created_at: i64,
}

impl From<SqliteAttempt> for AttemptRecord {
    fn from(row: SqliteAttempt) -> Self {
        AttemptRecord {
            id: row.id,
            account_id: row.account_id.map(AccountId::new),
            login: row.login,
            origin: row.origin,
            succeeded: row.succeeded,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_default(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteAccountLastSuccess {
    account_id: i64,
    login: String,
    last_success_id: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteOriginLastSuccess {
    origin: String,
    last_success_id: i64,
}

#[async_trait]
impl LedgerRepository for SqliteLedgerRepository {
    async fn append(&self, attempt: NewAttempt) -> Result<AttemptRecord, Error> {
        let row = sqlx::query_as::<_, SqliteAttempt>(
            r#"
            INSERT INTO login_attempts (created_at, account_id, login, origin, succeeded)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, account_id, login, origin, succeeded, created_at
            "#,
        )
        .bind(attempt.created_at.timestamp())
        .bind(attempt.account_id.map(|id| id.as_i64()))
        .bind(&attempt.login)
        .bind(&attempt.origin)
        .bind(attempt.succeeded)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to append login attempt");
            StorageError::Database("Failed to append login attempt".to_string())
        })?;

        Ok(row.into())
    }

    async fn last_account_success(&self, account_id: AccountId) -> Result<Option<i64>, Error> {
        let last: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(id) FROM login_attempts WHERE account_id = ?1 AND succeeded = 1",
        )
        .bind(account_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to get last account success");
            StorageError::Database("Failed to get last account success".to_string())
        })?;

        Ok(last)
    }

    async fn count_account_attempts_after(
        &self,
        account_id: AccountId,
        after_id: i64,
    ) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM login_attempts WHERE account_id = ?1 AND id > ?2",
        )
        .bind(account_id.as_i64())
        .bind(after_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to count account attempts");
            StorageError::Database("Failed to count account attempts".to_string())
        })?;

        Ok(count as u64)
    }

    async fn last_origin_success(&self, origin: &str) -> Result<Option<i64>, Error> {
        let last: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(id) FROM login_attempts WHERE origin = ?1 AND succeeded = 1",
        )
        .bind(origin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to get last origin success");
            StorageError::Database("Failed to get last origin success".to_string())
        })?;

        Ok(last)
    }

    async fn count_origin_attempts_after(
        &self,
        origin: &str,
        after_id: i64,
    ) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM login_attempts WHERE origin = ?1 AND id > ?2",
        )
        .bind(origin)
        .bind(after_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to count origin attempts");
            StorageError::Database("Failed to count origin attempts".to_string())
        })?;

        Ok(count as u64)
    }

    async fn accounts_never_succeeded(&self, min_attempts: u32) -> Result<Vec<String>, Error> {
        let logins: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT t0.login FROM (
                SELECT account_id, login, MAX(succeeded) AS max_succeeded, COUNT(1) AS cnt
                FROM login_attempts
                WHERE account_id IS NOT NULL
                GROUP BY account_id
            ) AS t0
            WHERE t0.max_succeeded = 0 AND t0.cnt >= ?1
            "#,
        )
        .bind(i64::from(min_attempts))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to query never-succeeded accounts");
            StorageError::Database("Failed to query never-succeeded accounts".to_string())
        })?;

        Ok(logins)
    }

    async fn account_last_successes(&self) -> Result<Vec<AccountLastSuccess>, Error> {
        let rows = sqlx::query_as::<_, SqliteAccountLastSuccess>(
            r#"
            SELECT account_id, login, MAX(id) AS last_success_id
            FROM login_attempts
            WHERE account_id IS NOT NULL AND succeeded = 1
            GROUP BY account_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to query account last successes");
            StorageError::Database("Failed to query account last successes".to_string())
        })?;

        Ok(rows
            .into_iter()
            .map(|r| AccountLastSuccess {
                account_id: AccountId::new(r.account_id),
                login: r.login,
                last_success_id: r.last_success_id,
            })
            .collect())
    }

    async fn origins_never_succeeded(&self, min_attempts: u32) -> Result<Vec<String>, Error> {
        let origins: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT t0.origin FROM (
                SELECT origin, MAX(succeeded) AS max_succeeded, COUNT(1) AS cnt
                FROM login_attempts
                GROUP BY origin
            ) AS t0
            WHERE t0.max_succeeded = 0 AND t0.cnt >= ?1
            "#,
        )
        .bind(i64::from(min_attempts))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to query never-succeeded origins");
            StorageError::Database("Failed to query never-succeeded origins".to_string())
        })?;

        Ok(origins)
    }

    async fn origin_last_successes(&self) -> Result<Vec<OriginLastSuccess>, Error> {
        let rows = sqlx::query_as::<_, SqliteOriginLastSuccess>(
            r#"
            SELECT origin, MAX(id) AS last_success_id
            FROM login_attempts
            WHERE succeeded = 1
            GROUP BY origin
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to query origin last successes");
            StorageError::Database("Failed to query origin last successes".to_string())
        })?;

        Ok(rows
            .into_iter()
            .map(|r| OriginLastSuccess {
                origin: r.origin,
                last_success_id: r.last_success_id,
            })
            .collect())
    }

    async fn recent_account_successes(
        &self,
        account_id: AccountId,
        limit: u32,
    ) -> Result<Vec<AttemptRecord>, Error> {
        let rows = sqlx::query_as::<_, SqliteAttempt>(
            r#"
            SELECT id, account_id, login, origin, succeeded, created_at
            FROM login_attempts
            WHERE account_id = ?1 AND succeeded = 1
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )
        .bind(account_id.as_i64())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to query recent successes");
            StorageError::Database("Failed to query recent successes".to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
