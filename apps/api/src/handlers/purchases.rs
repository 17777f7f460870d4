use std::str::FromStr;

use axum::extract::{Extension, Path, State};

use campusconnect_core::Identity;
use campusconnect_domain::EventId;

use crate::dto::{PurchaseRequest, PurchaseResponse, PurchasedEventResponse};
use crate::error::ApiResult;
use crate::extract::Json;
use crate::state::AppState;

/// Buys one ticket. The body is optional; an absent `quantity` means one.
pub async fn purchase_event_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(event_id): Path<String>,
    payload: Option<Json<PurchaseRequest>>,
) -> ApiResult<Json<PurchaseResponse>> {
    let quantity = payload.and_then(|Json(request)| request.quantity);
    let receipt = state
        .purchase_service
        .purchase(&identity, EventId::from_str(&event_id)?, quantity)
        .await?;

    Ok(Json(PurchaseResponse::from(receipt)))
}

pub async fn list_purchased_events_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<PurchasedEventResponse>>> {
    let purchased = state
        .purchase_service
        .list_purchased_for_user(&identity)
        .await?
        .into_iter()
        .map(PurchasedEventResponse::from)
        .collect();

    Ok(Json(purchased))
}
