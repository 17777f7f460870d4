use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use campusconnect_application::{RegisterAdminInput, RegisterClubInput, RegisterStudentInput};
use campusconnect_core::Role;

use crate::dto::{
    AdminBootstrapRequest, AuthResponse, ClubSignupRequest, LoginRequest, StudentSignupRequest,
};
use crate::error::ApiResult;
use crate::extract::Json;
use crate::state::AppState;

/// Header carrying the admin bootstrap secret.
pub const BOOTSTRAP_TOKEN_HEADER: &str = "x-bootstrap-token";

pub async fn student_signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<StudentSignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let authenticated = state
        .account_service
        .register_student(RegisterStudentInput {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            course: payload.course,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::from(authenticated))))
}

pub async fn student_login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    login(&state, Role::Student, payload).await
}

pub async fn club_signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<ClubSignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let authenticated = state
        .account_service
        .register_club(RegisterClubInput {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::from(authenticated))))
}

pub async fn club_login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    login(&state, Role::Club, payload).await
}

pub async fn admin_bootstrap_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AdminBootstrapRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let bootstrap_token = headers
        .get(BOOTSTRAP_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let authenticated = state
        .account_service
        .bootstrap_admin(
            bootstrap_token,
            RegisterAdminInput {
                name: payload.name,
                email: payload.email,
                password: payload.password,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::from(authenticated))))
}

pub async fn admin_login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    login(&state, Role::Admin, payload).await
}

async fn login(state: &AppState, role: Role, payload: LoginRequest) -> ApiResult<Json<AuthResponse>> {
    let authenticated = state
        .account_service
        .login(role, &payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse::from(authenticated)))
}
