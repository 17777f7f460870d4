use std::collections::HashMap;

use async_trait::async_trait;
use campusconnect_application::{EventRepository, PurchaseOutcome};
use campusconnect_core::{AccountId, AppError, AppResult};
use campusconnect_domain::{Event, EventId, EventPatch};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// In-memory event store.
///
/// Purchases take the write lock for the whole check-and-append, which makes
/// them atomic per event.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<EventId, Event>>,
}

impl InMemoryEventRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }

    async fn filtered(&self, keep: impl Fn(&Event) -> bool) -> Vec<Event> {
        let events = self.events.read().await;

        let mut values: Vec<Event> = events.values().filter(|event| keep(event)).cloned().collect();
        values.sort_by(|left, right| {
            right
                .date()
                .cmp(&left.date())
                .then_with(|| right.created_at().cmp(&left.created_at()))
        });
        values
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert_event(&self, event: Event) -> AppResult<()> {
        let mut events = self.events.write().await;

        if events.contains_key(&event.id()) {
            return Err(AppError::Conflict(format!(
                "event '{}' already exists",
                event.id()
            )));
        }

        events.insert(event.id(), event);
        Ok(())
    }

    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>> {
        Ok(self.events.read().await.get(&event_id).cloned())
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        Ok(self.filtered(|_| true).await)
    }

    async fn list_events_for_club(&self, club_id: AccountId) -> AppResult<Vec<Event>> {
        Ok(self.filtered(|event| event.is_owned_by(club_id)).await)
    }

    async fn list_events_purchased_by(&self, buyer_id: AccountId) -> AppResult<Vec<Event>> {
        Ok(self.filtered(|event| event.has_purchased(buyer_id)).await)
    }

    async fn record_purchase(
        &self,
        event_id: EventId,
        buyer_id: AccountId,
        purchased_at: DateTime<Utc>,
    ) -> AppResult<PurchaseOutcome> {
        let mut events = self.events.write().await;
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
        let mut events = self.events.write().await;
        let Some(event) = events.get_mut(&event_id) else {
            return Ok(None);
        };

        let mut updated = event.clone();
        updated.apply_patch(patch)?;
        *event = updated.clone();

        Ok(Some(updated))
    }

    async fn delete_owned_event(&self, event_id: EventId, club_id: AccountId) -> AppResult<bool> {
        let mut events = self.events.write().await;

        if !events
            .get(&event_id)
            .is_some_and(|event| event.is_owned_by(club_id))
        {
            return Ok(false);
        }

        events.remove(&event_id);
        Ok(true)
    }

    async fn delete_event(&self, event_id: EventId) -> AppResult<bool> {
        Ok(self.events.write().await.remove(&event_id).is_some())
    }
}
