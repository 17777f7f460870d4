use async_trait::async_trait;
use chrono::{DateTime, Utc};

use campusconnect_core::{AccountId, AppResult};
use campusconnect_domain::{Event, EventId, EventPatch};

/// Result of the store's conditional ledger append.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    /// The entry was appended and the counter incremented; carries the
    /// post-update event.
    Recorded(Event),
    /// The buyer was already present in the ledger; nothing was written.
    AlreadyPurchased,
    /// No event has the requested identifier.
    EventNotFound,
}

/// Repository port for event records and their embedded ledgers.
///
/// Every mutation targets exactly one event and must be atomic with respect
/// to other mutations of that same event.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persists a freshly created event.
    async fn insert_event(&self, event: Event) -> AppResult<()>;

    /// Returns one event by identifier.
    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>>;

    /// Lists every event, newest date first.
    async fn list_events(&self) -> AppResult<Vec<Event>>;

    /// Lists events owned by a club, newest date first.
    async fn list_events_for_club(&self, club_id: AccountId) -> AppResult<Vec<Event>>;

    /// Lists events whose ledger contains the buyer.
    async fn list_events_purchased_by(&self, buyer_id: AccountId) -> AppResult<Vec<Event>>;

    /// Checks the ledger for `buyer_id` and, when absent, appends one entry
    /// and increments the counter as a single indivisible step.
    async fn record_purchase(
        &self,
        event_id: EventId,
        buyer_id: AccountId,
        purchased_at: DateTime<Utc>,
    ) -> AppResult<PurchaseOutcome>;

    /// Applies a validated partial update. Returns `None` when the event
    /// does not exist.
    async fn update_event(&self, event_id: EventId, patch: EventPatch)
    -> AppResult<Option<Event>>;

    /// Deletes the event only when it is owned by `club_id`. Returns whether
    /// a record was removed.
    async fn delete_owned_event(&self, event_id: EventId, club_id: AccountId) -> AppResult<bool>;

    /// Deletes the event regardless of owner. Returns whether a record was
    /// removed.
    async fn delete_event(&self, event_id: EventId) -> AppResult<bool>;
}
