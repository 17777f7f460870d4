use chrono::{DateTime, Utc};

use campusconnect_core::{AccountId, AppResult, Identity, Role};
use campusconnect_domain::{EventId, PurchaseId};

use crate::projections::account_summaries;
use crate::AccountSummary;

use super::EventService;

/// Number of purchasers shown per event in club stats.
const RECENT_PURCHASES_LIMIT: usize = 5;

/// One recent ledger entry with the buyer resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentPurchase {
    /// Ledger entry identifier.
    pub purchase_id: PurchaseId,
    /// Buyer, when the account still exists.
    pub buyer: Option<AccountSummary>,
    /// Purchase time.
    pub purchased_at: DateTime<Utc>,
}

/// Purchase aggregate for one club-owned event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPurchaseStats {
    /// Event identifier.
    pub event_id: EventId,
    /// Event name.
    pub name: String,
    /// Event date.
    pub date: DateTime<Utc>,
    /// Persisted purchase counter.
    pub total_purchases: u32,
    /// Latest purchasers, newest first.
    pub recent_purchases: Vec<RecentPurchase>,
}

impl EventService {
    /// Aggregates purchase counts and the most recent purchasers for each of
    /// the calling club's events, newest event date first.
    pub async fn club_stats(&self, club: &Identity) -> AppResult<Vec<EventPurchaseStats>> {
        club.require_role(Role::Club)?;

        let events = self.events.list_events_for_club(club.subject()).await?;
        let buyer_ids: Vec<AccountId> = events
            .iter()
            .flat_map(|event| {
                event
                    .recent_purchases(RECENT_PURCHASES_LIMIT)
                    .into_iter()
                    .map(|purchase| purchase.buyer_id())
            })
            .collect();
        let buyers = account_summaries(self.accounts.as_ref(), buyer_ids).await?;

        Ok(events
            .iter()
            .map(|event| EventPurchaseStats {
                event_id: event.id(),
                name: event.name().as_str().to_owned(),
                date: event.date(),
                total_purchases: event.purchase_count(),
                recent_purchases: event
                    .recent_purchases(RECENT_PURCHASES_LIMIT)
                    .into_iter()
                    .map(|purchase| RecentPurchase {
                        purchase_id: purchase.id(),
                        buyer: buyers.get(&purchase.buyer_id()).cloned(),
                        purchased_at: purchase.purchased_at(),
                    })
                    .collect(),
            })
            .collect())
    }
}
