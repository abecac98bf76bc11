use async_trait::async_trait;

use crate::{Account, AccountId, Error, NewAccount};

/// Repository for account data access.
///
/// Accounts are seed data: created once, then only ever read. There is no
/// update or delete path through the login engine.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Create a new account (seeding)
    async fn create(&self, account: NewAccount) -> Result<Account, Error>;

    /// Find an account by ID
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error>;

    /// Find an account by login name
    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, Error>;
}
