use std::collections::HashMap;

use async_trait::async_trait;
use campusconnect_application::AccountRepository;
use campusconnect_core::{AccountId, AppError, AppResult, Role};
use campusconnect_domain::{Account, ClubPatch};
use tokio::sync::RwLock;

/// In-memory account store keyed by id. `(role, email)` uniqueness is checked
/// under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_account(&self, account: Account) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;

        if accounts
            .values()
            .any(|stored| stored.role() == account.role() && stored.email() == account.email())
        {
            return Err(AppError::Conflict(format!(
                "{} already exists",
                account.role()
            )));
        }

        accounts.insert(account.id(), account);
        Ok(())
    }

    async fn find_by_email(&self, role: Role, email: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;

        Ok(accounts
            .values()
            .find(|account| account.role() == role && account.email().as_str() == email)
            .cloned())
    }

    async fn find_by_id(&self, account_id: AccountId) -> AppResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&account_id).cloned())
    }

    async fn find_by_ids(&self, account_ids: &[AccountId]) -> AppResult<Vec<Account>> {
        let accounts = self.accounts.read().await;

        Ok(account_ids
            .iter()
            .filter_map(|account_id| accounts.get(account_id).cloned())
            .collect())
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<Account>> {
        let accounts = self.accounts.read().await;

        let mut values: Vec<Account> = accounts
            .values()
            .filter(|account| account.role() == role)
            .cloned()
            .collect();
        values.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(values)
    }

    async fn update_club(
        &self,
        club_id: AccountId,
        patch: ClubPatch,
    ) -> AppResult<Option<Account>> {
        let mut accounts = self.accounts.write().await;
        let Some(account) = accounts
            .get_mut(&club_id)
            .filter(|account| account.role() == Role::Club)
        else {
            return Ok(None);
        };

        account.apply_club_patch(patch)?;
        Ok(Some(account.clone()))
    }

    async fn delete_account(&self, account_id: AccountId, role: Role) -> AppResult<bool> {
        let mut accounts = self.accounts.write().await;

        if !accounts
            .get(&account_id)
            .is_some_and(|account| account.role() == role)
        {
            return Ok(false);
        }

        accounts.remove(&account_id);
        Ok(true)
    }
}
