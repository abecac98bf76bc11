//! Schema migrations for the SQLite backend.
//!
//! A small migration runner specialized to SQLite: each migration is
//! applied inside a transaction and recorded in a tracking table so reruns
//! are no-ops.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

const MIGRATION_TABLE: &str = "_palisade_migrations";

#[async_trait]
pub trait SqliteMigration: Send + Sync {
    /// Unique version number for ordering migrations
    fn version(&self) -> i64;

    /// Human readable name of the migration
    fn name(&self) -> &str;

    /// Execute the migration
    async fn up(&self, conn: &mut SqliteConnection) -> Result<(), sqlx::Error>;

    /// Rollback the migration
    async fn down(&self, conn: &mut SqliteConnection) -> Result<(), sqlx::Error>;
}

pub struct SqliteMigrationManager {
    pool: SqlitePool,
}

impl SqliteMigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the migration tracking table.
    pub async fn initialize(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            format!(
                r#"
            CREATE TABLE IF NOT EXISTS {MIGRATION_TABLE} (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at INTEGER NOT NULL DEFAULT (unixepoch())
            );"#,
            )
            .as_str(),
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Apply pending migrations.
    pub async fn up(&self, migrations: &[Box<dyn SqliteMigration>]) -> Result<(), sqlx::Error> {
        for migration in migrations {
            if !self.is_applied(migration.version()).await? {
                let mut tx = self.pool.begin().await?;

                tracing::info!(
                    "Applying migration {} ({})",
                    migration.name(),
                    migration.version()
                );

                migration.up(&mut *tx).await?;

                sqlx::query(
                    format!(
                        "INSERT INTO {MIGRATION_TABLE} (version, name, applied_at) VALUES (?, ?, ?)",
                    )
                    .as_str(),
                )
                .bind(migration.version())
                .bind(migration.name())
                .bind(Utc::now().timestamp())
                .execute(&mut *tx)
                .await?;

                tx.commit().await?;
            }
        }
        Ok(())
    }

    /// Rollback applied migrations.
    pub async fn down(&self, migrations: &[Box<dyn SqliteMigration>]) -> Result<(), sqlx::Error> {
        for migration in migrations {
            if self.is_applied(migration.version()).await? {
                let mut tx = self.pool.begin().await?;

                tracing::info!(
                    "Rolling back migration {} ({})",
                    migration.name(),
                    migration.version()
                );

                migration.down(&mut *tx).await?;

                sqlx::query(
                    format!("DELETE FROM {MIGRATION_TABLE} WHERE version = ?").as_str(),
                )
                .bind(migration.version())
                .execute(&mut *tx)
                .await?;

                tx.commit().await?;
            }
        }
        Ok(())
    }

    /// Check if a specific migration was applied.
    pub async fn is_applied(&self, version: i64) -> Result<bool, sqlx::Error> {
        let applied: bool = sqlx::query_scalar(
            format!("SELECT EXISTS(SELECT 1 FROM {MIGRATION_TABLE} WHERE version = ?)").as_str(),
        )
        .bind(version)
        .fetch_one(&self.pool)
        .await?;
        Ok(applied)
    }
}

/// The full migration set for this backend, in application order.
pub fn all_migrations() -> Vec<Box<dyn SqliteMigration>> {
    vec![
        Box::new(CreateAccountsTable),
        Box::new(CreateLoginAttemptsTable),
        Box::new(CreateLoginAttemptIndexes),
    ]
}

pub struct CreateAccountsTable;

#[async_trait]
impl SqliteMigration for CreateAccountsTable {
    fn version(&self) -> i64 {
        1
    }

    fn name(&self) -> &str {
        "CreateAccountsTable"
    }

    async fn up(&self, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                login TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                salt TEXT NOT NULL
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down(&self, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
        sqlx::query("DROP TABLE IF EXISTS accounts").execute(conn).await?;
        Ok(())
    }
}

pub struct CreateLoginAttemptsTable;

#[async_trait]
impl SqliteMigration for CreateLoginAttemptsTable {
    fn version(&self) -> i64 {
        2
    }

    fn name(&self) -> &str {
        "CreateLoginAttemptsTable"
    }

    async fn up(&self, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
        // AUTOINCREMENT prevents rowid reuse, so sequence ids stay strictly
        // increasing for the lifetime of the ledger.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS login_attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at INTEGER NOT NULL,
                account_id INTEGER,
                login TEXT NOT NULL,
                origin TEXT NOT NULL,
                succeeded INTEGER NOT NULL
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down(&self, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
        sqlx::query("DROP TABLE IF EXISTS login_attempts")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateLoginAttemptIndexes;

#[async_trait]
impl SqliteMigration for CreateLoginAttemptIndexes {
    fn version(&self) -> i64 {
        3
    }

    fn name(&self) -> &str {
        "CreateLoginAttemptIndexes"
    }

    async fn up(&self, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
        // The policy engine point reads run on every login attempt; both
        // key shapes need covering indexes.
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_login_attempts_account
             ON login_attempts (account_id, succeeded, id)",
        )
        .execute(&mut *conn)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_login_attempts_origin
             ON login_attempts (origin, succeeded, id)",
        )
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn down(&self, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
        sqlx::query("DROP INDEX IF EXISTS idx_login_attempts_account")
            .execute(&mut *conn)
            .await?;
        sqlx::query("DROP INDEX IF EXISTS idx_login_attempts_origin")
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
