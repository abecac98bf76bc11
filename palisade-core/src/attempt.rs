//! Login attempt records
//!
//! The attempt ledger is an append-only sequence of these records; it is
//! the sole source of truth for lock and ban state. Records are never
//! updated or deleted, and the sequence id assigned at insert time is the
//! ordering key every policy decision depends on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// One recorded login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Strictly increasing sequence id assigned at insert time. The
    /// tie-breaker for "most recent"; timestamps are informational only.
    pub id: i64,

    /// The account the submitted login name resolved to, if any.
    pub account_id: Option<AccountId>,

    /// The login name exactly as submitted.
    pub login: String,

    /// Network identity the attempt came from.
    pub origin: String,

    /// Whether the attempt authenticated successfully.
    pub succeeded: bool,

    /// When the attempt happened.
    pub created_at: DateTime<Utc>,
}

/// Data for appending an attempt to the ledger.
///
/// The timestamp is supplied by the caller; the sequence id is assigned by
/// the store on insert.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub account_id: Option<AccountId>,
    pub login: String,
    pub origin: String,
    pub succeeded: bool,
    pub created_at: DateTime<Utc>,
}

impl NewAttempt {
    /// A successful attempt for a known account.
    pub fn success(
        account_id: AccountId,
        login: impl Into<String>,
        origin: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: Some(account_id),
            login: login.into(),
            origin: origin.into(),
            succeeded: true,
            created_at,
        }
    }

    /// A failed attempt; `account_id` is `None` when the submitted login
    /// name matched no account.
    pub fn failure(
        account_id: Option<AccountId>,
        login: impl Into<String>,
        origin: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            login: login.into(),
            origin: origin.into(),
            succeeded: false,
            created_at,
        }
    }
}
