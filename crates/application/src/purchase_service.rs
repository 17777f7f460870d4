//! Ticket purchases against the event ledger.
//!
//! A buyer holds at most one ledger entry per event. The duplicate check and
//! the append are delegated to [`EventRepository::record_purchase`], which
//! runs them as one atomic step on the stored record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use campusconnect_core::{AppError, AppResult, Identity, Role};
use campusconnect_domain::{EventId, PurchaseId};

use crate::projections::club_summaries;
use crate::{AccountRepository, ClubSummary, EventRepository, PurchaseOutcome};

/// Result returned to the buyer after a successful purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    /// Counter value after the purchase.
    pub purchase_count: u32,
    /// Purchased event.
    pub event_id: EventId,
    /// Purchased event name.
    pub event_name: String,
    /// Purchased event date.
    pub event_date: DateTime<Utc>,
}

/// One row of a buyer's ticket list.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchasedEvent {
    /// Event identifier.
    pub event_id: EventId,
    /// Event name.
    pub name: String,
    /// Event date.
    pub date: DateTime<Utc>,
    /// Event venue.
    pub venue: String,
    /// Ticket price.
    pub price: f64,
    /// Owning club, when the club account still exists.
    pub club: Option<ClubSummary>,
    /// When the buyer purchased.
    pub purchased_at: DateTime<Utc>,
    /// The buyer's own ledger entry.
    pub purchase_id: PurchaseId,
}

/// Application service for buying tickets.
#[derive(Clone)]
pub struct PurchaseService {
    events: Arc<dyn EventRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl PurchaseService {
    /// Creates a new purchase service.
    #[must_use]
    pub fn new(events: Arc<dyn EventRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { events, accounts }
    }

    /// Buys one ticket for `buyer`.
    ///
    /// Only students may buy. `quantity` defaults to 1; any other value is
    /// rejected because the ledger holds one entry per buyer.
    pub async fn purchase(
        &self,
        buyer: &Identity,
        event_id: EventId,
        quantity: Option<u32>,
    ) -> AppResult<PurchaseReceipt> {
        buyer.require_role(Role::Student)?;

        match quantity.unwrap_or(1) {
            1 => {}
            0 => {
                return Err(AppError::Validation(
                    "quantity must be at least 1".to_owned(),
                ));
            }
            requested => {
                return Err(AppError::Validation(format!(
                    "quantity must be 1: each student can hold only one ticket per event \
                     (requested {requested})"
                )));
            }
        }

        let outcome = self
            .events
            .record_purchase(event_id, buyer.subject(), Utc::now())
            .await?;

        match outcome {
            PurchaseOutcome::Recorded(event) => {
                info!(
                    event_id = %event.id(),
                    buyer = %buyer.subject(),
                    purchase_count = event.purchase_count(),
                    "ticket purchased"
                );

                Ok(PurchaseReceipt {
                    purchase_count: event.purchase_count(),
                    event_id: event.id(),
                    event_name: event.name().as_str().to_owned(),
                    event_date: event.date(),
                })
            }
            PurchaseOutcome::AlreadyPurchased => {
                warn!(%event_id, buyer = %buyer.subject(), "duplicate purchase rejected");
                Err(AppError::DuplicatePurchase(
                    "you have already purchased this event".to_owned(),
                ))
            }
            PurchaseOutcome::EventNotFound => {
                Err(AppError::NotFound(format!("event '{event_id}' not found")))
            }
        }
    }

    /// Lists every event the caller holds a ticket for, one row per event,
    /// projected from the caller's own ledger entry.
    pub async fn list_purchased_for_user(
        &self,
        identity: &Identity,
    ) -> AppResult<Vec<PurchasedEvent>> {
        let buyer_id = identity.subject();
        let events = self.events.list_events_purchased_by(buyer_id).await?;
        let clubs = club_summaries(
            self.accounts.as_ref(),
            events.iter().map(|event| event.owner_club_id()).collect(),
        )
        .await?;

        Ok(events
            .iter()
            .filter_map(|event| {
                let purchase = event.purchase_for(buyer_id)?;
                Some(PurchasedEvent {
                    event_id: event.id(),
                    name: event.name().as_str().to_owned(),
                    date: event.date(),
                    venue: event.venue().as_str().to_owned(),
                    price: event.price().value(),
                    club: clubs.get(&event.owner_club_id()).cloned(),
                    purchased_at: purchase.purchased_at(),
                    purchase_id: purchase.id(),
                })
            })
            .collect())
    }
}
