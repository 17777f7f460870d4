use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use campusconnect_core::{AccountId, AppResult};
use campusconnect_domain::{AuditAction, AuditTargetType};

/// One administrative mutation, append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Stable entry identifier.
    pub entry_id: Uuid,
    /// What the admin did.
    pub action: AuditAction,
    /// Kind of record touched.
    pub target_type: AuditTargetType,
    /// Identifier of the record touched.
    pub target_id: String,
    /// Admin that performed the mutation.
    pub actor_admin_id: AccountId,
    /// When the mutation was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for audit log listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub offset: usize,
}

/// Port for the append-only admin audit log.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Persists one entry.
    async fn append_entry(&self, entry: AuditLogEntry) -> AppResult<()>;

    /// Lists entries newest first.
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>>;

    /// Counts all entries.
    async fn count_entries(&self) -> AppResult<u64>;

    /// Lists every entry for one target, newest first.
    async fn list_entries_for_target(
        &self,
        target_type: AuditTargetType,
        target_id: &str,
    ) -> AppResult<Vec<AuditLogEntry>>;
}
