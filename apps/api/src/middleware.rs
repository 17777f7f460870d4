use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use campusconnect_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Verifies the bearer assertion and exposes the resulting `Identity` to
/// handlers as a request extension.
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = state
        .account_service
        .identity_provider()
        .verify(bearer_token(request.headers())?)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("no token provided".to_owned()))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("invalid token".to_owned()))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AppError::Unauthenticated("invalid token".to_owned()))?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AppError::Unauthenticated("invalid token".to_owned()));
    }

    Ok(token.trim())
}
