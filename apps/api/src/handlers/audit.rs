use axum::extract::{Extension, Path, Query, State};

use campusconnect_core::Identity;

use crate::dto::{AuditLogEntryResponse, AuditLogPageResponse};
use crate::error::ApiResult;
use crate::extract::Json;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct AuditLogPageQuery {
    pub page: Option<String>,
}

/// Lists one page of the admin log. Unparsable page numbers serve page 1.
pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<AuditLogPageQuery>,
) -> ApiResult<Json<AuditLogPageResponse>> {
    let page = query.page.and_then(|value| value.trim().parse::<u64>().ok());
    let page = state.audit_log_service.list(&identity, page).await?;

    Ok(Json(AuditLogPageResponse::from(page)))
}

pub async fn target_activity_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((target_type, target_id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .audit_log_service
        .activity_for_target(&identity, &target_type, &target_id)
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
