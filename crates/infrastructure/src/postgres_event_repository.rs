//! PostgreSQL-backed event store.
//!
//! The purchase ledger lives in a `purchases` JSONB array next to a
//! `purchase_count` column. A purchase is one conditional `UPDATE` that
//! appends the entry and bumps the counter only when the buyer is not yet in
//! the ledger; concurrent purchases on the same row serialize on its row lock
//! and the loser re-evaluates the condition against the winner's write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use sqlx::{FromRow, PgPool};

use campusconnect_application::{EventRepository, PurchaseOutcome};
use campusconnect_core::{AccountId, AppError, AppResult};
use campusconnect_domain::{Event, EventId, EventParts, EventPatch, Purchase};

const EVENT_COLUMNS: &str = r#"
    id,
    name,
    event_date,
    venue,
    price,
    owner_club_id,
    purchases,
    purchase_count,
    created_at
"#;

/// PostgreSQL implementation of the event repository port.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_events(&self, filter: EventFilter) -> AppResult<Vec<Event>> {
        let predicate = match filter {
            EventFilter::All => "",
            EventFilter::OwnedBy(_) => "WHERE owner_club_id = $1",
            EventFilter::PurchasedBy(_) => "WHERE purchases @> $1::JSONB",
        };
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events {predicate} ORDER BY event_date DESC, created_at DESC"
        );

        let query = sqlx::query_as::<_, EventRow>(&sql);
        let query = match filter {
            EventFilter::All => query,
            EventFilter::OwnedBy(club_id) => query.bind(club_id.as_uuid()),
            EventFilter::PurchasedBy(buyer_id) => query.bind(buyer_filter(buyer_id)),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list events: {error}")))?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum EventFilter {
    All,
    OwnedBy(AccountId),
    PurchasedBy(AccountId),
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: uuid::Uuid,
    name: String,
    event_date: DateTime<Utc>,
    venue: String,
    price: f64,
    owner_club_id: uuid::Uuid,
    purchases: Value,
    purchase_count: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let purchases: Vec<Purchase> = serde_json::from_value(row.purchases).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode purchase ledger for event '{}': {error}",
                row.id
            ))
        })?;
        let purchase_count = u32::try_from(row.purchase_count).map_err(|_| {
            AppError::Internal(format!(
                "event '{}' has negative purchase_count {}",
                row.id, row.purchase_count
            ))
        })?;

        Event::from_parts(EventParts {
            id: EventId::from_uuid(row.id),
            name: row.name,
            date: row.event_date,
            venue: row.venue,
            price: row.price,
            owner_club_id: AccountId::from_uuid(row.owner_club_id),
            created_at: row.created_at,
            purchases,
            purchase_count,
        })
    }
}

fn buyer_filter(buyer_id: AccountId) -> Value {
    json!([{ "buyer_id": buyer_id }])
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn insert_event(&self, event: Event) -> AppResult<()> {
        let purchases = serde_json::to_value(event.purchases()).map_err(|error| {
            AppError::Internal(format!("failed to encode purchase ledger: {error}"))
        })?;
        let purchase_count = i32::try_from(event.purchase_count()).map_err(|_| {
            AppError::Internal(format!("event '{}' purchase_count overflows", event.id()))
        })?;

        sqlx::query(
            r#"
            INSERT INTO events (
                id,
                name,
                event_date,
                venue,
                price,
                owner_club_id,
                purchases,
                purchase_count,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.name().as_str())
        .bind(event.date())
        .bind(event.venue().as_str())
        .bind(event.price().value())
        .bind(event.owner_club_id().as_uuid())
        .bind(purchases)
        .bind(purchase_count)
        .bind(event.created_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(ref database_error) = error
                && database_error.code().as_deref() == Some("23505")
            {
                return AppError::Conflict(format!("event '{}' already exists", event.id()));
            }
            AppError::Internal(format!("failed to insert event '{}': {error}", event.id()))
        })?;

        Ok(())
    }

    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");

        sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find event '{event_id}': {error}"))
            })?
            .map(Event::try_from)
            .transpose()
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        self.fetch_events(EventFilter::All).await
    }

    async fn list_events_for_club(&self, club_id: AccountId) -> AppResult<Vec<Event>> {
        self.fetch_events(EventFilter::OwnedBy(club_id)).await
    }

    async fn list_events_purchased_by(&self, buyer_id: AccountId) -> AppResult<Vec<Event>> {
        self.fetch_events(EventFilter::PurchasedBy(buyer_id)).await
    }

    async fn record_purchase(
        &self,
        event_id: EventId,
        buyer_id: AccountId,
        purchased_at: DateTime<Utc>,
    ) -> AppResult<PurchaseOutcome> {
        let entry = serde_json::to_value([Purchase::new(buyer_id, purchased_at)]).map_err(
            |error| AppError::Internal(format!("failed to encode purchase: {error}")),
        )?;

        let sql = format!(
            r#"
            UPDATE events
            SET purchases = purchases || $2::JSONB,
                purchase_count = purchase_count + 1
            WHERE id = $1
                AND NOT purchases @> $3::JSONB
            RETURNING {EVENT_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id.as_uuid())
            .bind(entry)
            .bind(buyer_filter(buyer_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to record purchase for event '{event_id}': {error}"
                ))
            })?;

        if let Some(row) = updated {
            return Event::try_from(row).map(PurchaseOutcome::Recorded);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
            .bind(event_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to look up event '{event_id}': {error}"))
            })?;

        Ok(if exists {
            PurchaseOutcome::AlreadyPurchased
        } else {
            PurchaseOutcome::EventNotFound
        })
    }

    async fn update_event(
        &self,
        event_id: EventId,
        patch: EventPatch,
    ) -> AppResult<Option<Event>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start update transaction for event '{event_id}': {error}"
            ))
        })?;

        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE");
        let Some(row) = sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id.as_uuid())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to lock event '{event_id}': {error}"))
            })?
        else {
            return Ok(None);
        };

        let mut event = Event::try_from(row)?;
        event.apply_patch(patch)?;

        sqlx::query(
            r#"
            UPDATE events
            SET name = $2,
                event_date = $3,
                venue = $4,
                price = $5
            WHERE id = $1
            "#,
        )
        .bind(event_id.as_uuid())
        .bind(event.name().as_str())
        .bind(event.date())
        .bind(event.venue().as_str())
        .bind(event.price().value())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update event '{event_id}': {error}"))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit update transaction for event '{event_id}': {error}"
            ))
        })?;

        Ok(Some(event))
    }

    async fn delete_owned_event(&self, event_id: EventId, club_id: AccountId) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM events WHERE id = $1 AND owner_club_id = $2")
            .bind(event_id.as_uuid())
            .bind(club_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete event '{event_id}': {error}"))
            })?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn delete_event(&self, event_id: EventId) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete event '{event_id}': {error}"))
            })?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
