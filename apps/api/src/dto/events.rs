use campusconnect_application::{
    EventListing, EventPurchaseStats, PurchaseReceipt, PurchasedEvent, RecentPurchase,
};
use campusconnect_domain::{Event, EventPatch, NewEvent};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use super::accounts::{AccountResponse, ClubResponse};

/// Incoming payload for event creation. Every field is required; missing
/// ones are reported as validation errors rather than rejected by the
/// JSON extractor.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-event-request.ts"
)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// RFC3339 timestamp or `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    /// Number or numeric string.
    #[serde(default, deserialize_with = "price_from_number_or_text")]
    #[ts(type = "number | string | null")]
    pub price: Option<f64>,
}

impl From<CreateEventRequest> for NewEvent {
    fn from(value: CreateEventRequest) -> Self {
        Self {
            name: value.name,
            date: value.date,
            venue: value.venue,
            price: value.price,
        }
    }
}

/// Admin patch for an event. Absent fields are left alone.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-event-request.ts"
)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    /// Number or numeric string.
    #[serde(default, deserialize_with = "price_from_number_or_text")]
    #[ts(type = "number | string | null")]
    pub price: Option<f64>,
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(value: UpdateEventRequest) -> Self {
        Self {
            name: value.name,
            date: value.date,
            venue: value.venue,
            price: value.price,
        }
    }
}

/// Reads a price sent as a JSON number or as a numeric string, which is
/// what HTML form inputs produce. A blank string counts as absent.
fn price_from_number_or_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    match Option::<RawPrice>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawPrice::Number(value)) => Ok(Some(value)),
        Some(RawPrice::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawPrice::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("price must be a number, got '{text}'"))),
    }
}

/// Incoming payload for a ticket purchase.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/purchase-request.ts"
)]
pub struct PurchaseRequest {
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// API representation of an event.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/event-response.ts"
)]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    pub date: String,
    pub venue: String,
    pub price: f64,
    pub owner_club_id: String,
    pub club: Option<ClubResponse>,
    pub purchase_count: u32,
    pub created_at: String,
}

impl EventResponse {
    fn with_club(event: &Event, club: Option<ClubResponse>) -> Self {
        Self {
            id: event.id().to_string(),
            name: event.name().as_str().to_owned(),
            date: event.date().to_rfc3339(),
            venue: event.venue().as_str().to_owned(),
            price: event.price().value(),
            owner_club_id: event.owner_club_id().to_string(),
            club,
            purchase_count: event.purchase_count(),
            created_at: event.created_at().to_rfc3339(),
        }
    }
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        Self::with_club(&value, None)
    }
}

impl From<EventListing> for EventResponse {
    fn from(value: EventListing) -> Self {
        Self::with_club(&value.event, value.club.map(ClubResponse::from))
    }
}

/// Event fields echoed back by a purchase.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/purchase-event-summary.ts"
)]
pub struct PurchaseEventSummary {
    pub id: String,
    pub name: String,
    pub date: String,
}

/// Successful purchase response.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/purchase-response.ts"
)]
pub struct PurchaseResponse {
    pub success: bool,
    pub message: String,
    pub purchase_count: u32,
    pub event: PurchaseEventSummary,
}

impl From<PurchaseReceipt> for PurchaseResponse {
    fn from(value: PurchaseReceipt) -> Self {
        Self {
            success: true,
            message: "Ticket purchased successfully".to_owned(),
            purchase_count: value.purchase_count,
            event: PurchaseEventSummary {
                id: value.event_id.to_string(),
                name: value.event_name,
                date: value.event_date.to_rfc3339(),
            },
        }
    }
}

/// One event the caller holds a ticket for.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/purchased-event-response.ts"
)]
pub struct PurchasedEventResponse {
    pub event_id: String,
    pub name: String,
    pub date: String,
    pub venue: String,
    pub price: f64,
    pub club: Option<ClubResponse>,
    pub purchased_at: String,
    pub purchase_id: String,
}

impl From<PurchasedEvent> for PurchasedEventResponse {
    fn from(value: PurchasedEvent) -> Self {
        Self {
            event_id: value.event_id.to_string(),
            name: value.name,
            date: value.date.to_rfc3339(),
            venue: value.venue,
            price: value.price,
            club: value.club.map(ClubResponse::from),
            purchased_at: value.purchased_at.to_rfc3339(),
            purchase_id: value.purchase_id.to_string(),
        }
    }
}

/// One recent purchaser in club stats.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/recent-purchase-response.ts"
)]
pub struct RecentPurchaseResponse {
    pub purchase_id: String,
    pub buyer: Option<AccountResponse>,
    pub purchased_at: String,
}

impl From<RecentPurchase> for RecentPurchaseResponse {
    fn from(value: RecentPurchase) -> Self {
        Self {
            purchase_id: value.purchase_id.to_string(),
            buyer: value.buyer.map(AccountResponse::from),
            purchased_at: value.purchased_at.to_rfc3339(),
        }
    }
}

/// Purchase aggregate for one club-owned event.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/event-stats-response.ts"
)]
pub struct EventStatsResponse {
    pub id: String,
    pub name: String,
    pub date: String,
    pub total_purchases: u32,
    pub recent_purchases: Vec<RecentPurchaseResponse>,
}

impl From<EventPurchaseStats> for EventStatsResponse {
    fn from(value: EventPurchaseStats) -> Self {
        Self {
            id: value.event_id.to_string(),
            name: value.name,
            date: value.date.to_rfc3339(),
            total_purchases: value.total_purchases,
            recent_purchases: value
                .recent_purchases
                .into_iter()
                .map(RecentPurchaseResponse::from)
                .collect(),
        }
    }
}
