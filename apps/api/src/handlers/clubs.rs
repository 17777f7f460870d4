use std::str::FromStr;

use axum::extract::{Extension, Path, State};

use campusconnect_core::{AccountId, Identity};

use crate::dto::{ClubResponse, MessageResponse, UpdateClubRequest};
use crate::error::ApiResult;
use crate::extract::Json;
use crate::state::AppState;

pub async fn list_clubs_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ClubResponse>>> {
    let clubs = state
        .account_service
        .list_clubs()
        .await?
        .into_iter()
        .map(ClubResponse::from)
        .collect();

    Ok(Json(clubs))
}

pub async fn admin_list_clubs_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<ClubResponse>>> {
    let clubs = state
        .account_service
        .admin_list_clubs(&identity)
        .await?
        .into_iter()
        .map(ClubResponse::from)
        .collect();

    Ok(Json(clubs))
}

pub async fn admin_update_club_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(club_id): Path<String>,
    Json(payload): Json<UpdateClubRequest>,
) -> ApiResult<Json<ClubResponse>> {
    let club = state
        .account_service
        .admin_update_club(&identity, AccountId::from_str(&club_id)?, payload.into())
        .await?;

    Ok(Json(ClubResponse::from(club)))
}

pub async fn admin_delete_club_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(club_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .account_service
        .admin_delete_club(&identity, AccountId::from_str(&club_id)?)
        .await?;

    Ok(Json(MessageResponse::new("Club deleted successfully")))
}
