use tracing::info;

use campusconnect_core::{AccountId, AppError, AppResult, Identity, Role};
use campusconnect_domain::{AuditAction, ClubPatch};

use crate::ClubSummary;

use super::AccountService;

impl AccountService {
    /// Public club directory ordered by name.
    pub async fn list_clubs(&self) -> AppResult<Vec<ClubSummary>> {
        Ok(self
            .accounts
            .list_by_role(Role::Club)
            .await?
            .iter()
            .filter_map(ClubSummary::from_account)
            .collect())
    }

    /// Club directory for moderation.
    pub async fn admin_list_clubs(&self, admin: &Identity) -> AppResult<Vec<ClubSummary>> {
        admin.require_role(Role::Admin)?;
        self.list_clubs().await
    }

    /// Patches a club profile and records `UPDATE_CLUB`.
    pub async fn admin_update_club(
        &self,
        admin: &Identity,
        club_id: AccountId,
        patch: ClubPatch,
    ) -> AppResult<ClubSummary> {
        admin.require_role(Role::Admin)?;

        let account = self
            .accounts
            .update_club(club_id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("club '{club_id}' not found")))?;
        let summary = ClubSummary::from_account(&account)
            .ok_or_else(|| AppError::Internal(format!("account '{club_id}' is not a club")))?;

        self.audit_log
            .record(admin, AuditAction::UpdateClub, club_id.to_string())
            .await?;
        info!(club = %club_id, admin = %admin.subject(), "club updated by admin");

        Ok(summary)
    }

    /// Deletes a club account and records `DELETE_CLUB`. Events the club
    /// owned are left in place.
    pub async fn admin_delete_club(&self, admin: &Identity, club_id: AccountId) -> AppResult<()> {
        admin.require_role(Role::Admin)?;

        if !self.accounts.delete_account(club_id, Role::Club).await? {
            return Err(AppError::NotFound(format!("club '{club_id}' not found")));
        }

        self.audit_log
            .record(admin, AuditAction::DeleteClub, club_id.to_string())
            .await?;
        info!(club = %club_id, admin = %admin.subject(), "club deleted by admin");

        Ok(())
    }
}
