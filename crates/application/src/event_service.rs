//! Role-scoped event management.
//!
//! Clubs create, list and delete their own events. Admins may list, patch and
//! delete any event; every admin mutation is written to the audit log.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use campusconnect_core::{AppError, AppResult, Identity, Role};
use campusconnect_domain::{Event, EventId, NewEvent};

use crate::projections::club_summaries;
use crate::{AccountRepository, AuditLogService, ClubSummary, EventRepository};

mod admin;
mod stats;

pub use stats::{EventPurchaseStats, RecentPurchase};

/// Event joined with its owning club's public profile.
#[derive(Debug, Clone, PartialEq)]
pub struct EventListing {
    /// The event record.
    pub event: Event,
    /// Owning club, when the club account still exists.
    pub club: Option<ClubSummary>,
}

/// Application service for event lifecycle operations.
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    accounts: Arc<dyn AccountRepository>,
    audit_log: AuditLogService,
}

impl EventService {
    /// Creates a new event service.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventRepository>,
        accounts: Arc<dyn AccountRepository>,
        audit_log: AuditLogService,
    ) -> Self {
        Self {
            events,
            accounts,
            audit_log,
        }
    }

    /// Creates an event owned by the calling club.
    pub async fn create_event(&self, club: &Identity, input: NewEvent) -> AppResult<Event> {
        club.require_role(Role::Club)?;

        let event = Event::create(club.subject(), input, Utc::now())?;
        self.events.insert_event(event.clone()).await?;

        info!(event_id = %event.id(), club = %club.subject(), "event created");
        Ok(event)
    }

    /// Deletes an event owned by the calling club.
    ///
    /// Missing and foreign events are indistinguishable to the caller.
    pub async fn delete_event(&self, club: &Identity, event_id: EventId) -> AppResult<()> {
        club.require_role(Role::Club)?;

        if !self
            .events
            .delete_owned_event(event_id, club.subject())
            .await?
        {
            return Err(AppError::NotFound(
                "event not found or not authorized".to_owned(),
            ));
        }

        info!(%event_id, club = %club.subject(), "event deleted by owner");
        Ok(())
    }

    /// Lists the calling club's events, newest date first.
    pub async fn list_events_for_club(&self, club: &Identity) -> AppResult<Vec<Event>> {
        club.require_role(Role::Club)?;
        self.events.list_events_for_club(club.subject()).await
    }

    /// Lists every event with its club summary, newest date first.
    pub async fn list_all_events(&self) -> AppResult<Vec<EventListing>> {
        let events = self.events.list_events().await?;
        self.with_clubs(events).await
    }

    async fn with_clubs(&self, events: Vec<Event>) -> AppResult<Vec<EventListing>> {
        let clubs = club_summaries(
            self.accounts.as_ref(),
            events.iter().map(Event::owner_club_id).collect(),
        )
        .await?;

        Ok(events
            .into_iter()
            .map(|event| EventListing {
                club: clubs.get(&event.owner_club_id()).cloned(),
                event,
            })
            .collect())
    }
}
