use tracing::info;

use campusconnect_core::{AppError, AppResult, Identity, Role};
use campusconnect_domain::{AuditAction, EventId, EventPatch};

use super::{EventListing, EventService};

impl EventService {
    /// Lists every event for moderation, most recently created first.
    pub async fn admin_list_events(&self, admin: &Identity) -> AppResult<Vec<EventListing>> {
        admin.require_role(Role::Admin)?;

        let mut events = self.events.list_events().await?;
        events.sort_by_key(|event| std::cmp::Reverse(event.created_at()));
        self.with_clubs(events).await
    }

    /// Applies a partial patch to any event and records `UPDATE_EVENT`.
    pub async fn admin_update_event(
        &self,
        admin: &Identity,
        event_id: EventId,
        patch: EventPatch,
    ) -> AppResult<EventListing> {
        admin.require_role(Role::Admin)?;

        let event = self
            .events
            .update_event(event_id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event '{event_id}' not found")))?;

        self.audit_log
            .record(admin, AuditAction::UpdateEvent, event_id.to_string())
            .await?;
        info!(%event_id, admin = %admin.subject(), "event updated by admin");

        let mut listed = self.with_clubs(vec![event]).await?;
        listed
            .pop()
            .ok_or_else(|| AppError::Internal("updated event vanished from projection".to_owned()))
    }

    /// Deletes any event and records `DELETE_EVENT`.
    pub async fn admin_delete_event(&self, admin: &Identity, event_id: EventId) -> AppResult<()> {
        admin.require_role(Role::Admin)?;

        if !self.events.delete_event(event_id).await? {
            return Err(AppError::NotFound(format!("event '{event_id}' not found")));
        }

        self.audit_log
            .record(admin, AuditAction::DeleteEvent, event_id.to_string())
            .await?;
        info!(%event_id, admin = %admin.subject(), "event deleted by admin");

        Ok(())
    }
}
