//! Event records and their embedded purchase ledger.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use campusconnect_core::{AccountId, AppError, AppResult, NonEmptyString};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EventId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| AppError::Validation(format!("invalid event id '{value}'")))
    }
}

/// Unique identifier for one ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PurchaseId(Uuid);

impl PurchaseId {
    /// Creates a new random purchase identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PurchaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PurchaseId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Non-negative, finite ticket price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TicketPrice(f64);

impl TicketPrice {
    /// Validates a price value.
    pub fn new(value: f64) -> AppResult<Self> {
        if !value.is_finite() {
            return Err(AppError::Validation("price must be a finite number".to_owned()));
        }

        if value < 0.0 {
            return Err(AppError::Validation("price must not be negative".to_owned()));
        }

        Ok(Self(value))
    }

    /// Returns the raw price.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Parses an event date given either as RFC3339 or as a bare `YYYY-MM-DD`
/// calendar date (interpreted as midnight UTC).
pub fn parse_event_date(value: &str) -> AppResult<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::Validation(format!("invalid event date '{value}'")))
}

/// One ticket held by one buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    id: PurchaseId,
    buyer_id: AccountId,
    purchased_at: DateTime<Utc>,
}

impl Purchase {
    /// Creates a ledger entry.
    #[must_use]
    pub fn new(buyer_id: AccountId, purchased_at: DateTime<Utc>) -> Self {
        Self {
            id: PurchaseId::new(),
            buyer_id,
            purchased_at,
        }
    }

    /// Returns the ledger entry identifier.
    #[must_use]
    pub fn id(&self) -> PurchaseId {
        self.id
    }

    /// Returns the buyer account.
    #[must_use]
    pub fn buyer_id(&self) -> AccountId {
        self.buyer_id
    }

    /// Returns when the ticket was bought.
    #[must_use]
    pub fn purchased_at(&self) -> DateTime<Utc> {
        self.purchased_at
    }
}

/// Unvalidated input for event creation. Every field is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEvent {
    /// Display name.
    pub name: Option<String>,
    /// RFC3339 timestamp or `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Venue label.
    pub venue: Option<String>,
    /// Ticket price.
    pub price: Option<f64>,
}

/// Partial update applied by administrators. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement date.
    pub date: Option<String>,
    /// Replacement venue.
    pub venue: Option<String>,
    /// Replacement price.
    pub price: Option<f64>,
}

impl EventPatch {
    /// Returns true when the patch carries no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.date.is_none() && self.venue.is_none() && self.price.is_none()
    }
}

/// Raw persisted state used to rebuild an [`Event`] from storage.
#[derive(Debug, Clone)]
pub struct EventParts {
    /// Stored identifier.
    pub id: EventId,
    /// Stored name.
    pub name: String,
    /// Stored date.
    pub date: DateTime<Utc>,
    /// Stored venue.
    pub venue: String,
    /// Stored price.
    pub price: f64,
    /// Owning club.
    pub owner_club_id: AccountId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Ledger in append order.
    pub purchases: Vec<Purchase>,
    /// Persisted counter.
    pub purchase_count: u32,
}

/// A club-published event with its purchase ledger.
///
/// `purchase_count` is stored redundantly next to `purchases` and must always
/// equal its length; every buyer appears at most once in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: EventId,
    name: NonEmptyString,
    date: DateTime<Utc>,
    venue: NonEmptyString,
    price: TicketPrice,
    owner_club_id: AccountId,
    created_at: DateTime<Utc>,
    purchases: Vec<Purchase>,
    purchase_count: u32,
}

impl Event {
    /// Validates creation input and builds an event owned by `owner_club_id`.
    pub fn create(
        owner_club_id: AccountId,
        input: NewEvent,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let (Some(name), Some(date), Some(venue), Some(price)) =
            (input.name, input.date, input.venue, input.price)
        else {
            return Err(AppError::Validation("missing required fields".to_owned()));
        };

        Ok(Self {
            id: EventId::new(),
            name: NonEmptyString::new(name)?,
            date: parse_event_date(&date)?,
            venue: NonEmptyString::new(venue)?,
            price: TicketPrice::new(price)?,
            owner_club_id,
            created_at,
            purchases: Vec::new(),
            purchase_count: 0,
        })
    }

    /// Rebuilds an event from storage, rejecting states that break the
    /// ledger invariants.
    pub fn from_parts(parts: EventParts) -> AppResult<Self> {
        let ledger_length = u32::try_from(parts.purchases.len())
            .map_err(|_| AppError::Internal("purchase ledger is too large".to_owned()))?;
        if ledger_length != parts.purchase_count {
            return Err(AppError::Internal(format!(
                "event '{}' has purchase_count {} but {} ledger entries",
                parts.id, parts.purchase_count, ledger_length
            )));
        }

        for (index, purchase) in parts.purchases.iter().enumerate() {
            if parts.purchases[..index]
                .iter()
                .any(|earlier| earlier.buyer_id == purchase.buyer_id)
            {
                return Err(AppError::Internal(format!(
                    "event '{}' lists buyer '{}' more than once",
                    parts.id, purchase.buyer_id
                )));
            }
        }

        Ok(Self {
            id: parts.id,
            name: NonEmptyString::new(parts.name)?,
            date: parts.date,
            venue: NonEmptyString::new(parts.venue)?,
            price: TicketPrice::new(parts.price)?,
            owner_club_id: parts.owner_club_id,
            created_at: parts.created_at,
            purchases: parts.purchases,
            purchase_count: parts.purchase_count,
        })
    }

    /// Returns the event identifier.
    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the scheduled date.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns the venue.
    #[must_use]
    pub fn venue(&self) -> &NonEmptyString {
        &self.venue
    }

    /// Returns the ticket price.
    #[must_use]
    pub fn price(&self) -> TicketPrice {
        self.price
    }

    /// Returns the club that created the event.
    #[must_use]
    pub fn owner_club_id(&self) -> AccountId {
        self.owner_club_id
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the ledger in append order.
    #[must_use]
    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    /// Returns the persisted purchase counter.
    #[must_use]
    pub fn purchase_count(&self) -> u32 {
        self.purchase_count
    }

    /// Returns true when the club may edit or delete this event.
    #[must_use]
    pub fn is_owned_by(&self, club_id: AccountId) -> bool {
        self.owner_club_id == club_id
    }

    /// Returns the buyer's ledger entry, if any.
    #[must_use]
    pub fn purchase_for(&self, buyer_id: AccountId) -> Option<&Purchase> {
        self.purchases
            .iter()
            .find(|purchase| purchase.buyer_id == buyer_id)
    }

    /// Returns true when the buyer already holds a ticket.
    #[must_use]
    pub fn has_purchased(&self, buyer_id: AccountId) -> bool {
        self.purchase_for(buyer_id).is_some()
    }

    /// Appends one ledger entry and bumps the counter in the same step.
    ///
    /// Callers must run this inside the store's per-record critical section
    /// so the duplicate check and the append cannot interleave.
    pub fn record_purchase(
        &mut self,
        buyer_id: AccountId,
        purchased_at: DateTime<Utc>,
    ) -> AppResult<&Purchase> {
        if self.has_purchased(buyer_id) {
            return Err(AppError::DuplicatePurchase(
                "you have already purchased this event".to_owned(),
            ));
        }

        self.purchases.push(Purchase::new(buyer_id, purchased_at));
        self.purchase_count += 1;

        self.purchases
            .last()
            .ok_or_else(|| AppError::Internal("ledger append was lost".to_owned()))
    }

    /// Applies an administrative patch. All supplied fields are validated
    /// before any of them is written.
    pub fn apply_patch(&mut self, patch: EventPatch) -> AppResult<()> {
        let name = patch.name.map(NonEmptyString::new).transpose()?;
        let date = patch.date.as_deref().map(parse_event_date).transpose()?;
        let venue = patch.venue.map(NonEmptyString::new).transpose()?;
        let price = patch.price.map(TicketPrice::new).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(venue) = venue {
            self.venue = venue;
        }
        if let Some(price) = price {
            self.price = price;
        }

        Ok(())
    }

    /// Returns up to `limit` ledger entries, newest first.
    #[must_use]
    pub fn recent_purchases(&self, limit: usize) -> Vec<&Purchase> {
        let mut purchases: Vec<&Purchase> = self.purchases.iter().collect();
        purchases.sort_by(|left, right| right.purchased_at.cmp(&left.purchased_at));
        purchases.truncate(limit);
        purchases
    }
}
