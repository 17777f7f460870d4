use async_trait::async_trait;
use campusconnect_application::{AuditLogEntry, AuditLogQuery, AuditLogRepository};
use campusconnect_core::AppResult;
use campusconnect_domain::AuditTargetType;
use tokio::sync::RwLock;

/// In-memory append-only audit log.
#[derive(Debug, Default)]
pub struct InMemoryAuditLogRepository {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditLogRepository {
    /// Creates an empty in-memory audit log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn append_entry(&self, entry: AuditLogEntry) -> AppResult<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .rev()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn count_entries(&self) -> AppResult<u64> {
        Ok(self.entries.read().await.len() as u64)
    }

    async fn list_entries_for_target(
        &self,
        target_type: AuditTargetType,
        target_id: &str,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .rev()
            .filter(|entry| entry.target_type == target_type && entry.target_id == target_id)
            .cloned()
            .collect())
    }
}
