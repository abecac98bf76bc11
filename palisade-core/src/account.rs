//! Accounts and their identifiers
//!
//! Accounts are created out-of-band (seed data) and are immutable as far as
//! the login engine is concerned: the engine only ever looks them up by id
//! or by login name. The stored credential is a salted digest, never the
//! secret itself (see [`crate::crypto`] for the digest scheme).

use serde::{Deserialize, Serialize};

/// A unique, stable identifier for a specific account.
///
/// Assigned by the persistence layer at creation time; referenced from
/// attempt records. Strictly an identifier, it carries no ordering meaning
/// for policy decisions (the attempt sequence id does that).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        AccountId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for AccountId {
    fn from(id: i64) -> Self {
        AccountId(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The unique identifier for the account.
    pub id: AccountId,

    /// The unique login name.
    pub login: String,

    /// Hex digest of the salted secret.
    pub password_hash: String,

    /// The per-account salt the digest was computed with.
    pub salt: String,
}

/// Data for creating an account (seeding).
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub login: String,
    pub password_hash: String,
    pub salt: String,
}

impl NewAccount {
    pub fn new(login: impl Into<String>, password_hash: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password_hash: password_hash.into(),
            salt: salt.into(),
        }
    }
}
