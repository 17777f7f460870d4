use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use campusconnect_core::{AppResult, Identity, Role};
use campusconnect_domain::{AuditAction, AuditTargetType};

use crate::{AuditLogEntry, AuditLogQuery, AuditLogRepository};

/// Fixed page size of the admin log listing.
pub const AUDIT_LOG_PAGE_SIZE: usize = 10;

/// One page of the admin audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogPage {
    /// Entries on this page, newest first.
    pub entries: Vec<AuditLogEntry>,
    /// Number of pages available.
    pub total_pages: u64,
    /// One-based page number that was served.
    pub current_page: u64,
}

/// Application service owning the admin audit log.
#[derive(Clone)]
pub struct AuditLogService {
    repository: Arc<dyn AuditLogRepository>,
}

impl AuditLogService {
    /// Creates a new audit log service.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditLogRepository>) -> Self {
        Self { repository }
    }

    /// Appends one entry for a mutation `admin` just performed.
    pub async fn record(
        &self,
        admin: &Identity,
        action: AuditAction,
        target_id: impl Into<String>,
    ) -> AppResult<AuditLogEntry> {
        admin.require_role(Role::Admin)?;

        let entry = AuditLogEntry {
            entry_id: Uuid::new_v4(),
            action,
            target_type: action.target_type(),
            target_id: target_id.into(),
            actor_admin_id: admin.subject(),
            timestamp: Utc::now(),
        };
        self.repository.append_entry(entry.clone()).await?;

        info!(
            action = %entry.action,
            target_type = %entry.target_type,
            target_id = %entry.target_id,
            admin = %entry.actor_admin_id,
            "admin action recorded"
        );

        Ok(entry)
    }

    /// Lists one page of the log, newest first. Pages start at 1; `None` or
    /// `0` serve the first page.
    pub async fn list(&self, admin: &Identity, page: Option<u64>) -> AppResult<AuditLogPage> {
        admin.require_role(Role::Admin)?;

        let current_page = page.filter(|value| *value > 0).unwrap_or(1);
        let page_size = AUDIT_LOG_PAGE_SIZE as u64;
        let offset = usize::try_from((current_page - 1).saturating_mul(page_size))
            .unwrap_or(usize::MAX);

        let entries = self
            .repository
            .list_entries(AuditLogQuery {
                limit: AUDIT_LOG_PAGE_SIZE,
                offset,
            })
            .await?;
        let total = self.repository.count_entries().await?;

        Ok(AuditLogPage {
            entries,
            total_pages: total.div_ceil(page_size),
            current_page,
        })
    }

    /// Lists every entry touching one club or event, newest first.
    pub async fn activity_for_target(
        &self,
        admin: &Identity,
        target_type: &str,
        target_id: &str,
    ) -> AppResult<Vec<AuditLogEntry>> {
        admin.require_role(Role::Admin)?;

        let target_type = AuditTargetType::from_str(target_type)?;
        self.repository
            .list_entries_for_target(target_type, target_id)
            .await
    }
}

#[cfg(test)]
mod tests;
