//! In-process fakes shared by the service tests.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use campusconnect_core::{AccountId, AppError, AppResult, Identity, NonEmptyString, Role};
use campusconnect_domain::{
    Account, AccountProfile, AuditTargetType, ClubPatch, EmailAddress, Event, EventId, EventPatch,
};

use crate::{
    AccountRepository, AccountService, AuditLogEntry, AuditLogQuery, AuditLogRepository,
    AuditLogService, EventRepository, EventService, IdentityProvider, IssuedAssertion,
    PasswordHasher, PurchaseOutcome, PurchaseService,
};

pub(crate) const BOOTSTRAP_TOKEN: &str = "bootstrap-secret";

#[derive(Default)]
pub(crate) struct FakeEventRepository {
    events: Mutex<HashMap<EventId, Event>>,
}

#[async_trait]
impl EventRepository for FakeEventRepository {
    async fn insert_event(&self, event: Event) -> AppResult<()> {
        self.events.lock().await.insert(event.id(), event);
        Ok(())
    }

    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>> {
        Ok(self.events.lock().await.get(&event_id).cloned())
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let mut events: Vec<Event> = self.events.lock().await.values().cloned().collect();
        events.sort_by_key(|event| std::cmp::Reverse(event.date()));
        Ok(events)
    }

    async fn list_events_for_club(&self, club_id: AccountId) -> AppResult<Vec<Event>> {
        let mut events = self.list_events().await?;
        events.retain(|event| event.is_owned_by(club_id));
        Ok(events)
    }

    async fn list_events_purchased_by(&self, buyer_id: AccountId) -> AppResult<Vec<Event>> {
        let mut events = self.list_events().await?;
        events.retain(|event| event.has_purchased(buyer_id));
        Ok(events)
    }

    async fn record_purchase(
        &self,
        event_id: EventId,
        buyer_id: AccountId,
        purchased_at: DateTime<Utc>,
    ) -> AppResult<PurchaseOutcome> {
        let mut events = self.events.lock().await;
        let Some(event) = events.get_mut(&event_id) else {
            return Ok(PurchaseOutcome::EventNotFound);
        };

        match event.record_purchase(buyer_id, purchased_at) {
            Ok(_) => Ok(PurchaseOutcome::Recorded(event.clone())),
            Err(AppError::DuplicatePurchase(_)) => Ok(PurchaseOutcome::AlreadyPurchased),
            Err(error) => Err(error),
        }
    }

    async fn update_event(
        &self,
        event_id: EventId,
        patch: EventPatch,
    ) -> AppResult<Option<Event>> {
        let mut events = self.events.lock().await;
        let Some(event) = events.get_mut(&event_id) else {
            return Ok(None);
        };
        event.apply_patch(patch)?;
        Ok(Some(event.clone()))
    }

    async fn delete_owned_event(&self, event_id: EventId, club_id: AccountId) -> AppResult<bool> {
        let mut events = self.events.lock().await;
        if events
            .get(&event_id)
            .is_some_and(|event| event.is_owned_by(club_id))
        {
            events.remove(&event_id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete_event(&self, event_id: EventId) -> AppResult<bool> {
        Ok(self.events.lock().await.remove(&event_id).is_some())
    }
}

#[derive(Default)]
pub(crate) struct FakeAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

#[async_trait]
impl AccountRepository for FakeAccountRepository {
    async fn create_account(&self, account: Account) -> AppResult<()> {
        let mut accounts = self.accounts.lock().await;
        if accounts
            .iter()
            .any(|stored| stored.role() == account.role() && stored.email() == account.email())
        {
            return Err(AppError::Conflict("account already exists".to_owned()));
        }
        accounts.push(account);
        Ok(())
    }

    async fn find_by_email(&self, role: Role, email: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|account| account.role() == role && account.email().as_str() == email)
            .cloned())
    }

    async fn find_by_id(&self, account_id: AccountId) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|account| account.id() == account_id)
            .cloned())
    }

    async fn find_by_ids(&self, account_ids: &[AccountId]) -> AppResult<Vec<Account>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .filter(|account| account_ids.contains(&account.id()))
            .cloned()
            .collect())
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<Account>> {
        let mut listed: Vec<Account> = self
            .accounts
            .lock()
            .await
            .iter()
            .filter(|account| account.role() == role)
            .cloned()
            .collect();
        listed.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(listed)
    }

    async fn update_club(
        &self,
        club_id: AccountId,
        patch: ClubPatch,
    ) -> AppResult<Option<Account>> {
        let mut accounts = self.accounts.lock().await;
        let Some(account) = accounts
            .iter_mut()
            .find(|account| account.id() == club_id && account.role() == Role::Club)
        else {
            return Ok(None);
        };
        account.apply_club_patch(patch)?;
        Ok(Some(account.clone()))
    }

    async fn delete_account(&self, account_id: AccountId, role: Role) -> AppResult<bool> {
        let mut accounts = self.accounts.lock().await;
        let before = accounts.len();
        accounts.retain(|account| !(account.id() == account_id && account.role() == role));
        Ok(accounts.len() != before)
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditLogRepository {
    entries: Mutex<Vec<AuditLogEntry>>,
}

impl FakeAuditLogRepository {
    pub(crate) async fn snapshot(&self) -> Vec<AuditLogEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl AuditLogRepository for FakeAuditLogRepository {
    async fn append_entry(&self, entry: AuditLogEntry) -> AppResult<()> {
        self.entries.lock().await.push(entry);
        Ok(())
    }

    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .rev()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn count_entries(&self) -> AppResult<u64> {
        Ok(self.entries.lock().await.len() as u64)
    }

    async fn list_entries_for_target(
        &self,
        target_type: AuditTargetType,
        target_id: &str,
    ) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .rev()
            .filter(|entry| entry.target_type == target_type && entry.target_id == target_id)
            .cloned()
            .collect())
    }
}

pub(crate) struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Tokens are `role:uuid`; anything else fails verification.
pub(crate) struct FakeIdentityProvider;

impl IdentityProvider for FakeIdentityProvider {
    fn issue(&self, subject: AccountId, role: Role) -> AppResult<IssuedAssertion> {
        Ok(IssuedAssertion {
            token: format!("{role}:{subject}"),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }

    fn verify(&self, assertion: &str) -> AppResult<Identity> {
        let invalid = || AppError::Unauthenticated("invalid token".to_owned());
        let (role, subject) = assertion.split_once(':').ok_or_else(invalid)?;
        Ok(Identity::new(
            AccountId::from_str(subject).map_err(|_| invalid())?,
            Role::from_str(role).map_err(|_| invalid())?,
        ))
    }
}

/// Fully wired services over shared fakes.
pub(crate) struct Harness {
    pub events: Arc<FakeEventRepository>,
    pub accounts: Arc<FakeAccountRepository>,
    pub audit_log: Arc<FakeAuditLogRepository>,
    pub purchase_service: PurchaseService,
    pub event_service: EventService,
    pub audit_log_service: AuditLogService,
    pub account_service: AccountService,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let events = Arc::new(FakeEventRepository::default());
        let accounts = Arc::new(FakeAccountRepository::default());
        let audit_log = Arc::new(FakeAuditLogRepository::default());
        let audit_log_service = AuditLogService::new(audit_log.clone());

        Self {
            purchase_service: PurchaseService::new(events.clone(), accounts.clone()),
            event_service: EventService::new(
                events.clone(),
                accounts.clone(),
                audit_log_service.clone(),
            ),
            account_service: AccountService::new(
                accounts.clone(),
                Arc::new(FakePasswordHasher),
                Arc::new(FakeIdentityProvider),
                audit_log_service.clone(),
                BOOTSTRAP_TOKEN,
            ),
            audit_log_service,
            events,
            accounts,
            audit_log,
        }
    }

    /// Stores an account directly and returns its identity.
    pub(crate) async fn seed_account(&self, name: &str, profile: AccountProfile) -> Identity {
        let id = AccountId::new();
        let role = profile.role();
        let account = Account::new(
            id,
            EmailAddress::new(format!("{}@campus.edu", name.to_lowercase().replace(' ', ".")))
                .unwrap_or_else(|_| unreachable!()),
            NonEmptyString::new(name).unwrap_or_else(|_| unreachable!()),
            "hashed:irrelevant".to_owned(),
            profile,
            Utc::now(),
        );
        assert!(self.accounts.create_account(account).await.is_ok());
        Identity::new(id, role)
    }

    pub(crate) async fn seed_club(&self, name: &str) -> Identity {
        self.seed_account(
            name,
            AccountProfile::Club {
                description: Some(format!("{name} club")),
                image: None,
            },
        )
        .await
    }

    pub(crate) async fn seed_student(&self, name: &str) -> Identity {
        self.seed_account(
            name,
            AccountProfile::Student {
                course: "Computer Science".to_owned(),
                department: None,
                year: None,
            },
        )
        .await
    }

    pub(crate) async fn seed_admin(&self, name: &str) -> Identity {
        self.seed_account(name, AccountProfile::Admin).await
    }
}
