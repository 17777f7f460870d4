use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api_config::ApiConfig;
use crate::api_services::build_in_memory_state;

use super::build_router;

const BOOTSTRAP_TOKEN: &str = "router-test-bootstrap-token";

fn test_app() -> Router {
    let config = ApiConfig {
        migrate_only: false,
        database_url: None,
        frontend_url: "http://localhost:3000".to_owned(),
        api_host: "127.0.0.1".to_owned(),
        api_port: 5000,
        jwt_secret: "router-test-secret-that-is-long-enough-for-hs256".to_owned(),
        token_ttl_seconds: 3_600,
        admin_bootstrap_token: BOOTSTRAP_TOKEN.to_owned(),
    };
    let state = build_in_memory_state(&config).unwrap_or_else(|_| unreachable!());
    build_router(state, &config.frontend_url).unwrap_or_else(|_| unreachable!())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap_or_else(|_| unreachable!());

    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!());
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|_| unreachable!());
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

async fn signup(app: &Router, path: &str, body: Value) -> (String, String) {
    let (status, response) = send(app, Method::POST, path, &[], Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {response}");

    let token = response["token"].as_str().unwrap_or_default().to_owned();
    let id = response["account"]["id"]
        .as_str()
        .unwrap_or_default()
        .to_owned();
    (token, id)
}

async fn signup_club(app: &Router, email: &str) -> (String, String) {
    signup(
        app,
        "/api/clubs/signup",
        json!({
            "name": "Robotics Club",
            "email": email,
            "password": "gears-and-bolts-42",
            "description": "We build robots"
        }),
    )
    .await
}

async fn signup_student(app: &Router, email: &str) -> (String, String) {
    signup(
        app,
        "/api/students/signup",
        json!({
            "name": "Asha",
            "email": email,
            "password": "library-card-77",
            "course": "Computer Science"
        }),
    )
    .await
}

async fn bootstrap_admin(app: &Router) -> String {
    let (status, response) = send(
        app,
        Method::POST,
        "/api/admin/bootstrap",
        &[("x-bootstrap-token", BOOTSTRAP_TOKEN)],
        Some(json!({
            "name": "Dean",
            "email": "dean@campus.edu",
            "password": "moderation-key-19"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "bootstrap failed: {response}");

    response["token"].as_str().unwrap_or_default().to_owned()
}

async fn create_tech_fest(app: &Router, club_token: &str) -> String {
    let (status, response) = send(
        app,
        Method::POST,
        "/api/events",
        &[("authorization", bearer(club_token).as_str())],
        Some(json!({
            "name": "Tech Fest",
            "date": "2025-05-01",
            "venue": "Hall A",
            "price": 100
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {response}");
    assert_eq!(response["purchaseCount"], 0);

    response["id"].as_str().unwrap_or_default().to_owned()
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();

    let (status, response) = send(&app, Method::GET, "/health", &[], None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "status": "ok" }));
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer_token() {
    let app = test_app();

    let (missing, body) = send(&app, Method::GET, "/api/events/club", &[], None).await;
    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (garbled, _) = send(
        &app,
        Method::GET,
        "/api/events/club",
        &[(AUTHORIZATION.as_str(), "Bearer not-a-jwt")],
        None,
    )
    .await;
    assert_eq!(garbled, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ticket_purchase_flow_over_http() {
    let app = test_app();
    let (club_token, club_id) = signup_club(&app, "robotics@campus.edu").await;
    let (student_token, _) = signup_student(&app, "asha@campus.edu").await;
    let event_id = create_tech_fest(&app, &club_token).await;
    let purchase_uri = format!("/api/events/{event_id}/purchase");

    let (status, receipt) = send(
        &app,
        Method::POST,
        &purchase_uri,
        &[("authorization", bearer(&student_token).as_str())],
        Some(json!({ "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["success"], true);
    assert_eq!(receipt["purchaseCount"], 1);
    assert_eq!(receipt["event"]["id"], event_id.as_str());
    assert_eq!(receipt["event"]["name"], "Tech Fest");

    let (duplicate, body) = send(
        &app,
        Method::POST,
        &purchase_uri,
        &[("authorization", bearer(&student_token).as_str())],
        None,
    )
    .await;
    assert_eq!(duplicate, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.contains("already purchased"))
    );

    let (club_purchase, _) = send(
        &app,
        Method::POST,
        &purchase_uri,
        &[("authorization", bearer(&club_token).as_str())],
        None,
    )
    .await;
    assert_eq!(club_purchase, StatusCode::FORBIDDEN);

    let (status, purchased) = send(
        &app,
        Method::GET,
        "/api/events/user/purchased-events",
        &[("authorization", bearer(&student_token).as_str())],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purchased.as_array().map(Vec::len), Some(1));
    assert_eq!(purchased[0]["eventId"], event_id.as_str());
    assert_eq!(purchased[0]["club"]["id"], club_id.as_str());

    let (status, listed) = send(&app, Method::GET, "/api/events/all", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["purchaseCount"], 1);
    assert_eq!(listed[0]["club"]["name"], "Robotics Club");

    let (status, stats) = send(
        &app,
        Method::GET,
        "/api/events/club/stats",
        &[("authorization", bearer(&club_token).as_str())],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats[0]["totalPurchases"], 1);
    assert_eq!(stats[0]["recentPurchases"][0]["buyer"]["email"], "asha@campus.edu");
}

#[tokio::test]
async fn invalid_requests_map_to_client_errors() {
    let app = test_app();
    let (club_token, _) = signup_club(&app, "chess@campus.edu").await;
    let (student_token, _) = signup_student(&app, "ravi@campus.edu").await;

    let (missing_price, _) = send(
        &app,
        Method::POST,
        "/api/events",
        &[("authorization", bearer(&club_token).as_str())],
        Some(json!({ "name": "Blitz", "date": "2025-06-01", "venue": "Room 4" })),
    )
    .await;
    assert_eq!(missing_price, StatusCode::BAD_REQUEST);

    let (student_create, _) = send(
        &app,
        Method::POST,
        "/api/events",
        &[("authorization", bearer(&student_token).as_str())],
        Some(json!({ "name": "Blitz", "date": "2025-06-01", "venue": "Room 4", "price": 0 })),
    )
    .await;
    assert_eq!(student_create, StatusCode::FORBIDDEN);

    let (bad_id, _) = send(
        &app,
        Method::POST,
        "/api/events/not-a-uuid/purchase",
        &[("authorization", bearer(&student_token).as_str())],
        None,
    )
    .await;
    assert_eq!(bad_id, StatusCode::BAD_REQUEST);

    let (unknown_event, _) = send(
        &app,
        Method::POST,
        &format!("/api/events/{}/purchase", uuid::Uuid::new_v4()),
        &[("authorization", bearer(&student_token).as_str())],
        None,
    )
    .await;
    assert_eq!(unknown_event, StatusCode::NOT_FOUND);

    let (duplicate_signup, _) = send(
        &app,
        Method::POST,
        "/api/clubs/signup",
        &[],
        Some(json!({
            "name": "Chess Again",
            "email": "chess@campus.edu",
            "password": "another-strong-pass"
        })),
    )
    .await;
    assert_eq!(duplicate_signup, StatusCode::CONFLICT);

    let (bad_login, _) = send(
        &app,
        Method::POST,
        "/api/students/login",
        &[],
        Some(json!({ "email": "ravi@campus.edu", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(bad_login, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn json_body_errors_use_the_error_payload() {
    let app = test_app();
    let (club_token, _) = signup_club(&app, "chess@campus.edu").await;
    let (student_token, _) = signup_student(&app, "ravi@campus.edu").await;
    let club_auth = bearer(&club_token);
    let student_auth = bearer(&student_token);

    let (text_price, created) = send(
        &app,
        Method::POST,
        "/api/events",
        &[("authorization", club_auth.as_str())],
        Some(json!({ "name": "Blitz", "date": "2025-06-01", "venue": "Room 4", "price": "100" })),
    )
    .await;
    assert_eq!(text_price, StatusCode::CREATED, "create failed: {created}");
    assert_eq!(created["price"], 100.0);
    let event_id = created["id"].as_str().unwrap_or_default().to_owned();

    let (garbage_price, response) = send(
        &app,
        Method::POST,
        "/api/events",
        &[("authorization", club_auth.as_str())],
        Some(json!({ "name": "Blitz", "date": "2025-06-01", "venue": "Room 4", "price": "abc" })),
    )
    .await;
    assert_eq!(garbage_price, StatusCode::BAD_REQUEST);
    assert!(response["message"].is_string());

    let (negative_quantity, response) = send(
        &app,
        Method::POST,
        &format!("/api/events/{event_id}/purchase"),
        &[("authorization", student_auth.as_str())],
        Some(json!({ "quantity": -1 })),
    )
    .await;
    assert_eq!(negative_quantity, StatusCode::BAD_REQUEST);
    assert!(response["message"].is_string());

    let (two_tickets, response) = send(
        &app,
        Method::POST,
        &format!("/api/events/{event_id}/purchase"),
        &[("authorization", student_auth.as_str())],
        Some(json!({ "quantity": 2 })),
    )
    .await;
    assert_eq!(two_tickets, StatusCode::BAD_REQUEST);
    assert!(
        response["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("quantity must be 1")
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/events")
        .header(AUTHORIZATION, club_auth.as_str())
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": \"Blitz\""))
        .unwrap_or_else(|_| unreachable!());
    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|_| unreachable!());
    let malformed: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    assert!(malformed["message"].is_string());

    let (no_body, receipt) = send(
        &app,
        Method::POST,
        &format!("/api/events/{event_id}/purchase"),
        &[("authorization", student_auth.as_str())],
        None,
    )
    .await;
    assert_eq!(no_body, StatusCode::OK, "purchase failed: {receipt}");
    assert_eq!(receipt["purchaseCount"], 1);
}

#[tokio::test]
async fn only_the_owning_club_deletes_its_event() {
    let app = test_app();
    let (owner_token, _) = signup_club(&app, "drama@campus.edu").await;
    let (other_token, _) = signup_club(&app, "music@campus.edu").await;
    let event_id = create_tech_fest(&app, &owner_token).await;
    let uri = format!("/api/events/{event_id}");

    let (foreign, _) = send(
        &app,
        Method::DELETE,
        &uri,
        &[("authorization", bearer(&other_token).as_str())],
        None,
    )
    .await;
    assert_eq!(foreign, StatusCode::NOT_FOUND);

    let (owned, body) = send(
        &app,
        Method::DELETE,
        &uri,
        &[("authorization", bearer(&owner_token).as_str())],
        None,
    )
    .await;
    assert_eq!(owned, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted successfully");

    let (_, listed) = send(
        &app,
        Method::GET,
        "/api/events/club",
        &[("authorization", bearer(&owner_token).as_str())],
        None,
    )
    .await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn admin_moderation_is_logged() {
    let app = test_app();

    let (rejected, _) = send(
        &app,
        Method::POST,
        "/api/admin/bootstrap",
        &[("x-bootstrap-token", "guess")],
        Some(json!({
            "name": "Mallory",
            "email": "mallory@campus.edu",
            "password": "moderation-key-19"
        })),
    )
    .await;
    assert_eq!(rejected, StatusCode::UNAUTHORIZED);

    let admin_token = bootstrap_admin(&app).await;
    let (club_token, club_id) = signup_club(&app, "film@campus.edu").await;
    let event_id = create_tech_fest(&app, &club_token).await;

    let (club_on_admin_route, _) = send(
        &app,
        Method::GET,
        "/api/events/admin/all",
        &[("authorization", bearer(&club_token).as_str())],
        None,
    )
    .await;
    assert_eq!(club_on_admin_route, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/events/admin/{event_id}"),
        &[("authorization", bearer(&admin_token).as_str())],
        Some(json!({ "venue": "Main Auditorium" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["venue"], "Main Auditorium");
    assert_eq!(updated["name"], "Tech Fest");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/events/admin/{event_id}"),
        &[("authorization", bearer(&admin_token).as_str())],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, club) = send(
        &app,
        Method::PUT,
        &format!("/api/clubs/admin/{club_id}"),
        &[("authorization", bearer(&admin_token).as_str())],
        Some(json!({ "image": "https://img.campus.edu/film.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(club["description"], "We build robots");
    assert_eq!(club["image"], "https://img.campus.edu/film.png");

    let (_, listed) = send(&app, Method::GET, "/api/events/all", &[], None).await;
    assert_eq!(listed, json!([]));

    let (status, page) = send(
        &app,
        Method::GET,
        "/api/admin/logs?page=1",
        &[("authorization", bearer(&admin_token).as_str())],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["currentPage"], 1);
    assert_eq!(page["totalPages"], 1);
    let actions: Vec<&str> = page["logs"]
        .as_array()
        .map(|logs| logs.iter().filter_map(|log| log["action"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(actions.len(), 3);
    assert!(actions.contains(&"UPDATE_EVENT"));
    assert!(actions.contains(&"DELETE_EVENT"));
    assert!(actions.contains(&"UPDATE_CLUB"));

    let (status, activity) = send(
        &app,
        Method::GET,
        &format!("/api/admin/logs/event/{event_id}"),
        &[("authorization", bearer(&admin_token).as_str())],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(activity.as_array().map(Vec::len), Some(2));

    let (bad_type, _) = send(
        &app,
        Method::GET,
        &format!("/api/admin/logs/student/{event_id}"),
        &[("authorization", bearer(&admin_token).as_str())],
        None,
    )
    .await;
    assert_eq!(bad_type, StatusCode::BAD_REQUEST);
}
