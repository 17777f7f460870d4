use crate::dto::HealthResponse;
use crate::extract::Json;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
