use std::collections::HashMap;

use campusconnect_core::{AccountId, AppResult, Role};
use campusconnect_domain::{Account, AccountProfile};

use crate::AccountRepository;

/// Public account data. Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    /// Account identifier.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Account role.
    pub role: Role,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            name: account.name().as_str().to_owned(),
            email: account.email().as_str().to_owned(),
            role: account.role(),
        }
    }
}

/// Public club profile used in directories and event listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubSummary {
    /// Club account identifier.
    pub id: AccountId,
    /// Club name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Logo or banner URL.
    pub image: Option<String>,
}

impl ClubSummary {
    /// Projects a club account. Returns `None` for other roles.
    #[must_use]
    pub fn from_account(account: &Account) -> Option<Self> {
        let AccountProfile::Club { description, image } = account.profile() else {
            return None;
        };

        Some(Self {
            id: account.id(),
            name: account.name().as_str().to_owned(),
            email: account.email().as_str().to_owned(),
            description: description.clone(),
            image: image.clone(),
        })
    }
}

/// Resolves club summaries for a set of owner ids in one repository call.
pub(crate) async fn club_summaries(
    accounts: &dyn AccountRepository,
    mut ids: Vec<AccountId>,
) -> AppResult<HashMap<AccountId, ClubSummary>> {
    ids.sort();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(accounts
        .find_by_ids(&ids)
        .await?
        .iter()
        .filter_map(ClubSummary::from_account)
        .map(|summary| (summary.id, summary))
        .collect())
}

/// Resolves account summaries for a set of ids in one repository call.
pub(crate) async fn account_summaries(
    accounts: &dyn AccountRepository,
    mut ids: Vec<AccountId>,
) -> AppResult<HashMap<AccountId, AccountSummary>> {
    ids.sort();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(accounts
        .find_by_ids(&ids)
        .await?
        .iter()
        .map(|account| (account.id(), AccountSummary::from(account)))
        .collect())
}
