//! SQLite storage backend for palisade.
//!
//! Provides [`SqliteRepositoryProvider`], which implements the repository
//! traits from `palisade-core` over a `sqlx::SqlitePool`, along with the
//! schema migrations the repositories expect.
//!
//! Sequence ids for the attempt ledger are SQLite `AUTOINCREMENT` rowids:
//! the database serializes their assignment, so they are strictly
//! increasing with no duplicates even under concurrent appends, which is
//! the only cross-request ordering guarantee the core relies on.

pub mod migrations;
pub mod repositories;

pub use repositories::{
    SqliteAccountRepository, SqliteLedgerRepository, SqliteRepositoryProvider,
};
