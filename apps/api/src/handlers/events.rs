use std::str::FromStr;

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use campusconnect_core::Identity;
use campusconnect_domain::EventId;

use crate::dto::{
    CreateEventRequest, EventResponse, EventStatsResponse, MessageResponse, UpdateEventRequest,
};
use crate::error::ApiResult;
use crate::extract::Json;
use crate::state::AppState;

pub async fn create_event_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let event = state
        .event_service
        .create_event(&identity, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

pub async fn list_all_events_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state
        .event_service
        .list_all_events()
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(events))
}

pub async fn list_club_events_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state
        .event_service
        .list_events_for_club(&identity)
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(events))
}

pub async fn club_stats_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<EventStatsResponse>>> {
    let stats = state
        .event_service
        .club_stats(&identity)
        .await?
        .into_iter()
        .map(EventStatsResponse::from)
        .collect();

    Ok(Json(stats))
}

pub async fn delete_event_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .event_service
        .delete_event(&identity, EventId::from_str(&event_id)?)
        .await?;

    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

pub async fn admin_list_events_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state
        .event_service
        .admin_list_events(&identity)
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(events))
}

pub async fn admin_update_event_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let listing = state
        .event_service
        .admin_update_event(&identity, EventId::from_str(&event_id)?, payload.into())
        .await?;

    Ok(Json(EventResponse::from(listing)))
}

pub async fn admin_delete_event_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .event_service
        .admin_delete_event(&identity, EventId::from_str(&event_id)?)
        .await?;

    Ok(Json(MessageResponse::new("Event deleted successfully")))
}
