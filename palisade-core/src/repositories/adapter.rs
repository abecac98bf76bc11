//! Adapters that wrap a [`RepositoryProvider`] and implement the individual
//! repository traits, so services can stay generic over one repository.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    Account, AccountId, AttemptRecord, Error, NewAccount, NewAttempt,
    repositories::{
        AccountLastSuccess, AccountRepository, LedgerRepository, OriginLastSuccess,
        RepositoryProvider,
    },
};

pub struct AccountRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> AccountRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> AccountRepository for AccountRepositoryAdapter<R> {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        self.provider.account().create(account).await
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error> {
        self.provider.account().find_by_id(id).await
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, Error> {
        self.provider.account().find_by_login(login).await
    }
}

pub struct LedgerRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> LedgerRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> LedgerRepository for LedgerRepositoryAdapter<R> {
    async fn append(&self, attempt: NewAttempt) -> Result<AttemptRecord, Error> {
        self.provider.ledger().append(attempt).await
    }

    async fn last_account_success(&self, account_id: AccountId) -> Result<Option<i64>, Error> {
        self.provider.ledger().last_account_success(account_id).await
    }

    async fn count_account_attempts_after(
        &self,
        account_id: AccountId,
        after_id: i64,
    ) -> Result<u64, Error> {
        self.provider
            .ledger()
            .count_account_attempts_after(account_id, after_id)
            .await
    }

    async fn last_origin_success(&self, origin: &str) -> Result<Option<i64>, Error> {
        self.provider.ledger().last_origin_success(origin).await
    }

    async fn count_origin_attempts_after(
        &self,
        origin: &str,
        after_id: i64,
    ) -> Result<u64, Error> {
        self.provider
            .ledger()
            .count_origin_attempts_after(origin, after_id)
            .await
    }

    async fn accounts_never_succeeded(&self, min_attempts: u32) -> Result<Vec<String>, Error> {
        self.provider.ledger().accounts_never_succeeded(min_attempts).await
    }

    async fn account_last_successes(&self) -> Result<Vec<AccountLastSuccess>, Error> {
        self.provider.ledger().account_last_successes().await
    }

    async fn origins_never_succeeded(&self, min_attempts: u32) -> Result<Vec<String>, Error> {
        self.provider.ledger().origins_never_succeeded(min_attempts).await
    }

    async fn origin_last_successes(&self) -> Result<Vec<OriginLastSuccess>, Error> {
        self.provider.ledger().origin_last_successes().await
    }

    async fn recent_account_successes(
        &self,
        account_id: AccountId,
        limit: u32,
    ) -> Result<Vec<AttemptRecord>, Error> {
        self.provider
            .ledger()
            .recent_account_successes(account_id, limit)
            .await
    }
}
