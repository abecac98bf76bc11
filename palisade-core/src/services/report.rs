//! Batch report builder.
//!
//! Computes the full sets of currently-locked accounts and currently-banned
//! origins across the whole ledger. Recomputing the per-key streak on
//! demand for every key in the ledger would be quadratic, so the report
//! runs a two-step aggregate-then-verify pass instead:
//!
//! 1. Keys that have *never* succeeded are reported directly when their
//!    total attempt count reaches the threshold.
//! 2. Keys with at least one success are verified by counting attempts
//!    after their highest successful sequence id, the same primitive the
//!    per-key checks use, so the two computations cannot drift apart.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Error, LockoutConfig, repositories::LedgerRepository};

/// The administrative report: which accounts are currently locked and
/// which origins are currently banned. Serialized as a JSON object with
/// two array fields; order within each set is not significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockoutReport {
    pub locked_account_logins: HashSet<String>,
    pub banned_origins: HashSet<String>,
}

/// Service computing the [`LockoutReport`] from the full ledger.
pub struct ReportService<L: LedgerRepository> {
    ledger: Arc<L>,
    config: LockoutConfig,
}

impl<L: LedgerRepository> ReportService<L> {
    pub fn new(ledger: Arc<L>, config: LockoutConfig) -> Self {
        Self { ledger, config }
    }

    /// Compute both sets over the current ledger contents.
    pub async fn build_report(&self) -> Result<LockoutReport, Error> {
        Ok(LockoutReport {
            locked_account_logins: self.locked_account_logins().await?,
            banned_origins: self.banned_origins().await?,
        })
    }

    async fn locked_account_logins(&self) -> Result<HashSet<String>, Error> {
        let threshold = self.config.account_failure_threshold();
        let mut logins: HashSet<String> = self
            .ledger
            .accounts_never_succeeded(threshold)
            .await?
            .into_iter()
            .collect();

        for entry in self.ledger.account_last_successes().await? {
            let count = self
                .ledger
                .count_account_attempts_after(entry.account_id, entry.last_success_id)
                .await?;
            if count >= u64::from(threshold) {
                logins.insert(entry.login);
            }
        }

        Ok(logins)
    }

    async fn banned_origins(&self) -> Result<HashSet<String>, Error> {
        let threshold = self.config.origin_failure_threshold();
        let mut origins: HashSet<String> = self
            .ledger
            .origins_never_succeeded(threshold)
            .await?
            .into_iter()
            .collect();

        for entry in self.ledger.origin_last_successes().await? {
            let count = self
                .ledger
                .count_origin_attempts_after(&entry.origin, entry.last_success_id)
                .await?;
            if count >= u64::from(threshold) {
                origins.insert(entry.origin);
            }
        }

        Ok(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccountId, NewAttempt, services::testing::MemoryLedger};
    use chrono::Utc;

    async fn record(ledger: &MemoryLedger, account_id: Option<i64>, login: &str, origin: &str, succeeded: bool) {
        let attempt = if succeeded {
            NewAttempt::success(AccountId::new(account_id.unwrap()), login, origin, Utc::now())
        } else {
            NewAttempt::failure(account_id.map(AccountId::new), login, origin, Utc::now())
        };
        ledger.append(attempt).await.unwrap();
    }

    fn logins(report: &LockoutReport) -> Vec<&str> {
        let mut v: Vec<&str> = report.locked_account_logins.iter().map(|s| s.as_str()).collect();
        v.sort_unstable();
        v
    }

    #[tokio::test]
    async fn test_empty_ledger_empty_report() {
        let ledger = Arc::new(MemoryLedger::new());
        let service = ReportService::new(ledger, LockoutConfig::default());
        let report = service.build_report().await.unwrap();
        assert!(report.locked_account_logins.is_empty());
        assert!(report.banned_origins.is_empty());
    }

    #[tokio::test]
    async fn test_never_succeeded_account_reported_at_threshold() {
        let ledger = Arc::new(MemoryLedger::new());
        for _ in 0..3 {
            record(&ledger, Some(1), "alice", "10.0.0.1", false).await;
        }
        record(&ledger, Some(2), "bob", "10.0.0.2", false).await;

        let service = ReportService::new(ledger, LockoutConfig::new(3, 10).unwrap());
        let report = service.build_report().await.unwrap();
        assert_eq!(logins(&report), vec!["alice"]);
    }

    #[tokio::test]
    async fn test_success_then_streak_reported() {
        let ledger = Arc::new(MemoryLedger::new());
        // bob succeeded once, then failed three times.
        record(&ledger, Some(2), "bob", "10.0.0.2", false).await;
        record(&ledger, Some(2), "bob", "10.0.0.2", true).await;
        for _ in 0..3 {
            record(&ledger, Some(2), "bob", "10.0.0.2", false).await;
        }

        let service = ReportService::new(ledger, LockoutConfig::new(3, 10).unwrap());
        let report = service.build_report().await.unwrap();
        assert_eq!(logins(&report), vec!["bob"]);
    }

    #[tokio::test]
    async fn test_success_under_threshold_not_reported() {
        let ledger = Arc::new(MemoryLedger::new());
        record(&ledger, Some(2), "bob", "10.0.0.2", true).await;
        record(&ledger, Some(2), "bob", "10.0.0.2", false).await;
        record(&ledger, Some(2), "bob", "10.0.0.2", false).await;

        let service = ReportService::new(ledger, LockoutConfig::new(3, 10).unwrap());
        let report = service.build_report().await.unwrap();
        assert!(report.locked_account_logins.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_login_failures_count_toward_origin_only() {
        let ledger = Arc::new(MemoryLedger::new());
        // Failures with no account id: not reportable as a locked account,
        // but they ban the origin.
        for _ in 0..3 {
            record(&ledger, None, "ghost", "10.0.0.9", false).await;
        }

        let service = ReportService::new(ledger, LockoutConfig::new(3, 3).unwrap());
        let report = service.build_report().await.unwrap();
        assert!(report.locked_account_logins.is_empty());
        assert_eq!(
            report.banned_origins,
            HashSet::from(["10.0.0.9".to_string()])
        );
    }

    #[tokio::test]
    async fn test_report_agrees_with_per_key_checks() {
        use crate::services::LockoutService;

        let ledger = Arc::new(MemoryLedger::new());
        // A mixed history over several accounts and origins.
        record(&ledger, Some(1), "alice", "10.0.0.1", false).await;
        record(&ledger, Some(1), "alice", "10.0.0.1", true).await;
        record(&ledger, Some(1), "alice", "10.0.0.1", false).await;
        record(&ledger, Some(2), "bob", "10.0.0.2", false).await;
        record(&ledger, Some(2), "bob", "10.0.0.2", false).await;
        record(&ledger, Some(3), "carol", "10.0.0.3", true).await;
        record(&ledger, Some(3), "carol", "10.0.0.3", false).await;
        record(&ledger, Some(3), "carol", "10.0.0.3", false).await;
        record(&ledger, None, "ghost", "10.0.0.4", false).await;
        record(&ledger, None, "ghost", "10.0.0.4", false).await;

        let config = LockoutConfig::new(2, 2).unwrap();
        let report = ReportService::new(ledger.clone(), config).build_report().await.unwrap();
        let lockout = LockoutService::new(ledger.clone(), config);

        for (id, login) in [(1, "alice"), (2, "bob"), (3, "carol")] {
            let locked = lockout.is_account_locked(AccountId::new(id)).await.unwrap();
            assert_eq!(
                report.locked_account_logins.contains(login),
                locked,
                "report and per-key check disagree for {login}"
            );
        }
        for origin in ["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4"] {
            let banned = lockout.is_origin_banned(origin).await.unwrap();
            assert_eq!(
                report.banned_origins.contains(origin),
                banned,
                "report and per-key check disagree for {origin}"
            );
        }
    }

    #[test]
    fn test_report_json_shape() {
        let report = LockoutReport {
            locked_account_logins: HashSet::from(["alice".to_string()]),
            banned_origins: HashSet::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["lockedAccountLogins"], serde_json::json!(["alice"]));
        assert_eq!(json["bannedOrigins"], serde_json::json!([]));
    }
}
