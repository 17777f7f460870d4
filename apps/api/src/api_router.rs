use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use campusconnect_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

use cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/api/events", post(handlers::events::create_event_handler))
        .route(
            "/api/events/club",
            get(handlers::events::list_club_events_handler),
        )
        .route(
            "/api/events/club/stats",
            get(handlers::events::club_stats_handler),
        )
        .route(
            "/api/events/{event_id}",
            delete(handlers::events::delete_event_handler),
        )
        .route(
            "/api/events/{event_id}/purchase",
            post(handlers::purchases::purchase_event_handler),
        )
        .route(
            "/api/events/user/purchased-events",
            get(handlers::purchases::list_purchased_events_handler),
        )
        .route(
            "/api/events/admin/all",
            get(handlers::events::admin_list_events_handler),
        )
        .route(
            "/api/events/admin/{event_id}",
            put(handlers::events::admin_update_event_handler)
                .delete(handlers::events::admin_delete_event_handler),
        )
        .route(
            "/api/clubs/admin/all",
            get(handlers::clubs::admin_list_clubs_handler),
        )
        .route(
            "/api/clubs/admin/{club_id}",
            put(handlers::clubs::admin_update_club_handler)
                .delete(handlers::clubs::admin_delete_club_handler),
        )
        .route(
            "/api/admin/logs",
            get(handlers::audit::list_audit_log_handler),
        )
        .route(
            "/api/admin/logs/{target_type}/{target_id}",
            get(handlers::audit::target_activity_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_identity,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/students/signup",
            post(handlers::accounts::student_signup_handler),
        )
        .route(
            "/api/students/login",
            post(handlers::accounts::student_login_handler),
        )
        .route(
            "/api/clubs/signup",
            post(handlers::accounts::club_signup_handler),
        )
        .route(
            "/api/clubs/login",
            post(handlers::accounts::club_login_handler),
        )
        .route("/api/clubs/all", get(handlers::clubs::list_clubs_handler))
        .route(
            "/api/admin/bootstrap",
            post(handlers::accounts::admin_bootstrap_handler),
        )
        .route(
            "/api/admin/login",
            post(handlers::accounts::admin_login_handler),
        )
        .route(
            "/api/events/all",
            get(handlers::events::list_all_events_handler),
        );

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}

#[cfg(test)]
mod tests;
