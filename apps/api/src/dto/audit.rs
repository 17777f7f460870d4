use campusconnect_application::{AuditLogEntry, AuditLogPage};
use serde::Serialize;
use ts_rs::TS;

/// API representation of one admin audit log entry.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub id: String,
    pub action: String,
    pub target_type: String,
    pub target_id: String,
    pub actor_admin_id: String,
    pub timestamp: String,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            id: value.entry_id.to_string(),
            action: value.action.as_str().to_owned(),
            target_type: value.target_type.as_str().to_owned(),
            target_id: value.target_id,
            actor_admin_id: value.actor_admin_id.to_string(),
            timestamp: value.timestamp.to_rfc3339(),
        }
    }
}

/// One page of the admin audit log.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/audit-log-page-response.ts"
)]
pub struct AuditLogPageResponse {
    pub logs: Vec<AuditLogEntryResponse>,
    #[ts(type = "number")]
    pub total_pages: u64,
    #[ts(type = "number")]
    pub current_page: u64,
}

impl From<AuditLogPage> for AuditLogPageResponse {
    fn from(value: AuditLogPage) -> Self {
        Self {
            logs: value
                .entries
                .into_iter()
                .map(AuditLogEntryResponse::from)
                .collect(),
            total_pages: value.total_pages,
            current_page: value.current_page,
        }
    }
}
