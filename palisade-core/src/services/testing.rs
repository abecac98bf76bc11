//! In-memory repositories for service unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    Account, AccountId, AttemptRecord, Error, NewAccount, NewAttempt,
    error::StorageError,
    repositories::{AccountLastSuccess, AccountRepository, LedgerRepository, OriginLastSuccess},
};

/// Append-only in-memory ledger; sequence ids are assigned from a counter.
pub(crate) struct MemoryLedger {
    records: Mutex<Vec<AttemptRecord>>,
}

impl MemoryLedger {
    pub(crate) fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub(crate) fn last(&self) -> Option<AttemptRecord> {
        self.records.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LedgerRepository for MemoryLedger {
    async fn append(&self, attempt: NewAttempt) -> Result<AttemptRecord, Error> {
        let mut records = self.records.lock().unwrap();
        let record = AttemptRecord {
            id: records.len() as i64 + 1,
            account_id: attempt.account_id,
            login: attempt.login,
            origin: attempt.origin,
            succeeded: attempt.succeeded,
            created_at: attempt.created_at,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn last_account_success(&self, account_id: AccountId) -> Result<Option<i64>, Error> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.account_id == Some(account_id) && r.succeeded)
            .map(|r| r.id)
            .max())
    }

    async fn count_account_attempts_after(
        &self,
        account_id: AccountId,
        after_id: i64,
    ) -> Result<u64, Error> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.account_id == Some(account_id) && r.id > after_id)
            .count() as u64)
    }

    async fn last_origin_success(&self, origin: &str) -> Result<Option<i64>, Error> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.origin == origin && r.succeeded)
            .map(|r| r.id)
            .max())
    }

    async fn count_origin_attempts_after(
        &self,
        origin: &str,
        after_id: i64,
    ) -> Result<u64, Error> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.origin == origin && r.id > after_id)
            .count() as u64)
    }

    async fn accounts_never_succeeded(&self, min_attempts: u32) -> Result<Vec<String>, Error> {
        let records = self.records.lock().unwrap();
        let mut logins = Vec::new();
        let mut seen = Vec::new();
        for record in records.iter() {
            let Some(account_id) = record.account_id else {
                continue;
            };
            if seen.contains(&account_id) {
                continue;
            }
            seen.push(account_id);
            let group: Vec<_> = records
                .iter()
                .filter(|r| r.account_id == Some(account_id))
                .collect();
            if !group.iter().any(|r| r.succeeded) && group.len() as u64 >= min_attempts as u64 {
                logins.push(record.login.clone());
            }
        }
        Ok(logins)
    }

    async fn account_last_successes(&self) -> Result<Vec<AccountLastSuccess>, Error> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<AccountLastSuccess> = Vec::new();
        for record in records.iter().filter(|r| r.succeeded) {
            let Some(account_id) = record.account_id else {
                continue;
            };
            match out.iter_mut().find(|s| s.account_id == account_id) {
                Some(existing) if record.id > existing.last_success_id => {
                    existing.last_success_id = record.id;
                }
                Some(_) => {}
                None => out.push(AccountLastSuccess {
                    account_id,
                    login: record.login.clone(),
                    last_success_id: record.id,
                }),
            }
        }
        Ok(out)
    }

    async fn origins_never_succeeded(&self, min_attempts: u32) -> Result<Vec<String>, Error> {
        let records = self.records.lock().unwrap();
        let mut origins = Vec::new();
        for record in records.iter() {
            if origins.contains(&record.origin) {
                continue;
            }
            let group: Vec<_> = records.iter().filter(|r| r.origin == record.origin).collect();
            if !group.iter().any(|r| r.succeeded) && group.len() as u64 >= min_attempts as u64 {
                origins.push(record.origin.clone());
            }
        }
        Ok(origins)
    }

    async fn origin_last_successes(&self) -> Result<Vec<OriginLastSuccess>, Error> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<OriginLastSuccess> = Vec::new();
        for record in records.iter().filter(|r| r.succeeded) {
            match out.iter_mut().find(|s| s.origin == record.origin) {
                Some(existing) if record.id > existing.last_success_id => {
                    existing.last_success_id = record.id;
                }
                Some(_) => {}
                None => out.push(OriginLastSuccess {
                    origin: record.origin.clone(),
                    last_success_id: record.id,
                }),
            }
        }
        Ok(out)
    }

    async fn recent_account_successes(
        &self,
        account_id: AccountId,
        limit: u32,
    ) -> Result<Vec<AttemptRecord>, Error> {
        let records = self.records.lock().unwrap();
        let mut successes: Vec<_> = records
            .iter()
            .filter(|r| r.account_id == Some(account_id) && r.succeeded)
            .cloned()
            .collect();
        successes.sort_by_key(|r| std::cmp::Reverse(r.id));
        successes.truncate(limit as usize);
        Ok(successes)
    }
}

/// Ledger whose appends always fail; reads are served by the inner
/// [`MemoryLedger`], so policy checks still see seeded history.
pub(crate) struct BrokenLedger {
    pub(crate) inner: MemoryLedger,
}

impl BrokenLedger {
    pub(crate) fn new() -> Self {
        Self {
            inner: MemoryLedger::new(),
        }
    }
}

#[async_trait]
impl LedgerRepository for BrokenLedger {
    async fn append(&self, _attempt: NewAttempt) -> Result<AttemptRecord, Error> {
        Err(StorageError::Database("write failed".to_string()).into())
    }

    async fn last_account_success(&self, account_id: AccountId) -> Result<Option<i64>, Error> {
        self.inner.last_account_success(account_id).await
    }

    async fn count_account_attempts_after(
        &self,
        account_id: AccountId,
        after_id: i64,
    ) -> Result<u64, Error> {
        self.inner
            .count_account_attempts_after(account_id, after_id)
            .await
    }

    async fn last_origin_success(&self, origin: &str) -> Result<Option<i64>, Error> {
        self.inner.last_origin_success(origin).await
    }

    async fn count_origin_attempts_after(
        &self,
        origin: &str,
        after_id: i64,
    ) -> Result<u64, Error> {
        self.inner.count_origin_attempts_after(origin, after_id).await
    }

    async fn accounts_never_succeeded(&self, min_attempts: u32) -> Result<Vec<String>, Error> {
        self.inner.accounts_never_succeeded(min_attempts).await
    }

    async fn account_last_successes(&self) -> Result<Vec<AccountLastSuccess>, Error> {
        self.inner.account_last_successes().await
    }

    async fn origins_never_succeeded(&self, min_attempts: u32) -> Result<Vec<String>, Error> {
        self.inner.origins_never_succeeded(min_attempts).await
    }

    async fn origin_last_successes(&self) -> Result<Vec<OriginLastSuccess>, Error> {
        self.inner.origin_last_successes().await
    }

    async fn recent_account_successes(
        &self,
        account_id: AccountId,
        limit: u32,
    ) -> Result<Vec<AttemptRecord>, Error> {
        self.inner.recent_account_successes(account_id, limit).await
    }
}

/// In-memory account store; ids are assigned sequentially.
pub(crate) struct MemoryAccounts {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccounts {
    pub(crate) fn new() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryAccounts {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        let mut accounts = self.accounts.lock().unwrap();
        let created = Account {
            id: AccountId::new(accounts.len() as i64 + 1),
            login: account.login,
            password_hash: account.password_hash,
            salt: account.salt,
        };
        accounts.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, Error> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.login == login).cloned())
    }
}
