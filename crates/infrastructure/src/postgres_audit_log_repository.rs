use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use campusconnect_application::{AuditLogEntry, AuditLogQuery, AuditLogRepository};
use campusconnect_core::{AccountId, AppError, AppResult};
use campusconnect_domain::{AuditAction, AuditTargetType};

/// PostgreSQL-backed append-only admin audit log.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    id: uuid::Uuid,
    action: String,
    target_type: String,
    target_id: String,
    actor_admin_id: uuid::Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditLogRow> for AuditLogEntry {
    type Error = AppError;

    fn try_from(row: AuditLogRow) -> Result<Self, Self::Error> {
        let corrupt = |error: AppError| {
            AppError::Internal(format!("audit log entry '{}' is corrupt: {error}", row.id))
        };

        Ok(Self {
            entry_id: row.id,
            action: AuditAction::from_str(&row.action).map_err(corrupt)?,
            target_type: AuditTargetType::from_str(&row.target_type).map_err(corrupt)?,
            target_id: row.target_id,
            actor_admin_id: AccountId::from_uuid(row.actor_admin_id),
            timestamp: row.created_at,
        })
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn append_entry(&self, entry: AuditLogEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_audit_log (
                id,
                action,
                target_type,
                target_id,
                actor_admin_id,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.entry_id)
        .bind(entry.action.as_str())
        .bind(entry.target_type.as_str())
        .bind(entry.target_id.as_str())
        .bind(entry.actor_admin_id.as_uuid())
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit log entry: {error}")))?;

        Ok(())
    }

    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

        sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT id, action, target_type, target_id, actor_admin_id, created_at
            FROM admin_audit_log
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list audit log entries: {error}")))?
        .into_iter()
        .map(AuditLogEntry::try_from)
        .collect()
    }

    async fn count_entries(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_audit_log")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to count audit log entries: {error}"))
            })?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn list_entries_for_target(
        &self,
        target_type: AuditTargetType,
        target_id: &str,
    ) -> AppResult<Vec<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT id, action, target_type, target_id, actor_admin_id, created_at
            FROM admin_audit_log
            WHERE target_type = $1 AND target_id = $2
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(target_type.as_str())
        .bind(target_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list audit log entries for {target_type} '{target_id}': {error}"
            ))
        })?
        .into_iter()
        .map(AuditLogEntry::try_from)
        .collect()
    }
}
