//! Integration tests for the Club Forms Server API
//!
//! These tests drive the full router against a temporary SQLite database.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use club_forms_server::{app, open_database, AppState, Config};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a test configuration pointing at a database inside `temp_dir`
fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::from_source(|_| None).expect("default config");
    config.environment = "test".to_string();
    config.database_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
    config.max_submissions = 3;
    config
}

/// Create the app over a fresh database, returning the state for seeding
async fn create_test_app(temp_dir: &TempDir) -> (Router, AppState) {
    let config = test_config(temp_dir);
    let pool = open_database(&config)
        .await
        .expect("Failed to open test database");
    let state = AppState::new(pool, config);
    (app(state.clone()), state)
}

async fn seed_club(state: &AppState, name: &str) -> i64 {
    state
        .forms
        .directory()
        .register_club(name, None, None)
        .await
        .expect("Failed to seed club")
}

/// Parse response body as JSON
async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Create a POST request with JSON body
fn make_post_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Create a GET request
fn make_get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn chess_fields() -> Value {
    json!([
        {"label": "Full Name", "type": "text", "required": true},
        {"label": "Email", "type": "email", "required": true}
    ])
}

/// Open the Chess Club recruitment form and return the club id
async fn setup_chess_recruitment(app: &Router, state: &AppState) -> i64 {
    let club_id = seed_club(state, "Chess Club").await;

    let response = app
        .clone()
        .oneshot(make_post_request(
            "/api/recruitment/create",
            json!({"clubId": club_id, "fields": chess_fields()}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    club_id
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check_returns_healthy() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir).await;

    let response = app.oneshot(make_get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].as_str().is_some());
}

// =============================================================================
// Recruitment Form Tests
// =============================================================================

#[tokio::test]
async fn test_chess_club_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&temp_dir).await;
    let club_id = setup_chess_recruitment(&app, &state).await;

    // Form is open and its fields can be read back
    let response = app
        .clone()
        .oneshot(make_get_request(&format!("/api/recruitment/status/{}", club_id)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["exists"], true);

    let response = app
        .clone()
        .oneshot(make_get_request(&format!("/api/recruitment/details/{}", club_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    let fields = body["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0]["name"], "full_name");
    assert_eq!(fields[0]["label"], "Full Name");
    assert_eq!(fields[0]["type"], "text");
    assert_eq!(fields[0]["required"], true);
    assert_eq!(fields[1]["type"], "email");

    // Three submissions fit, the fourth is rejected
    let submission = json!({"full_name": "A", "email": "a@x.com"});
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(make_post_request(
                &format!("/api/recruitment/apply/{}", club_id),
                submission.clone(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(make_post_request(
            &format!("/api/recruitment/apply/{}", club_id),
            submission.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("Maximum 3"));

    // Responses as JSON
    let response = app
        .clone()
        .oneshot(make_get_request(&format!("/api/recruitment/responses/{}", club_id)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["columns"], json!(["id", "full_name", "email"]));
    assert_eq!(body["responses"].as_array().unwrap().len(), 3);
    assert_eq!(body["responses"][0]["email"], "a@x.com");

    // Responses as CSV
    let response = app
        .clone()
        .oneshot(make_get_request(&format!(
            "/api/recruitment/download_responses/{}",
            club_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Chess Club_recruitment_responses.csv\""
    );
    let csv = body_to_string(response.into_body()).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "id,full_name,email");
    assert_eq!(lines[1], "1,A,a@x.com");

    // Closing drops the table
    let response = app
        .clone()
        .oneshot(make_post_request(
            &format!("/api/recruitment/close/{}", club_id),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(make_get_request(&format!("/api/recruitment/status/{}", club_id)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["exists"], false);

    let response = app
        .oneshot(make_get_request(&format!("/api/recruitment/details/{}", club_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_club_returns_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir).await;

    let response = app
        .clone()
        .oneshot(make_get_request("/api/recruitment/status/99"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["message"], "Club not found");

    let response = app
        .oneshot(make_post_request(
            "/api/recruitment/create",
            json!({"clubId": 99, "fields": chess_fields()}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_field_labels_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&temp_dir).await;
    let club_id = seed_club(&state, "Chess Club").await;

    let response = app
        .oneshot(make_post_request(
            "/api/recruitment/create",
            json!({
                "clubId": club_id,
                "fields": [
                    {"label": "Full Name", "type": "text", "required": true},
                    {"label": "full name", "type": "text", "required": false}
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_to_json(response.into_body()).await;
    assert!(body["message"].as_str().unwrap().contains("full_name"));
}

#[tokio::test]
async fn test_unsafe_club_name_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&temp_dir).await;
    let club_id = seed_club(&state, "Robotics Club!").await;

    let response = app
        .clone()
        .oneshot(make_post_request(
            "/api/recruitment/create",
            json!({"clubId": club_id, "fields": chess_fields()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(make_get_request(&format!(
            "/api/recruitment/status/{}",
            club_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["exists"], false);
}

#[tokio::test]
async fn test_submission_with_unknown_field_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&temp_dir).await;
    let club_id = setup_chess_recruitment(&app, &state).await;

    let response = app
        .oneshot(make_post_request(
            &format!("/api/recruitment/apply/{}", club_id),
            json!({"full_name": "A", "email": "a@x.com", "\"; DROP TABLE clubs; --": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recruiting_clubs_lists_open_forms_only() {
    let temp_dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&temp_dir).await;
    setup_chess_recruitment(&app, &state).await;
    seed_club(&state, "Robotics Club").await;

    let response = app
        .oneshot(make_get_request("/api/recruiting-clubs"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    let clubs = body["clubs"].as_array().unwrap();
    assert_eq!(clubs.len(), 1);
    assert_eq!(clubs[0]["club_name"], "Chess Club");
}

// =============================================================================
// Event Application Tests
// =============================================================================

#[tokio::test]
async fn test_event_application_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&temp_dir).await;
    let club_id = seed_club(&state, "Chess Club").await;

    let response = app
        .clone()
        .oneshot(make_post_request(
            "/api/events/create",
            json!({
                "clubId": club_id,
                "eventName": "Spring Open",
                "eventVenue": "Hall B",
                "eventFields": [
                    {"label": "Name", "type": "text", "required": true},
                    {"label": "Rating", "type": "number", "required": false}
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    let event_id = body["eventId"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(make_get_request(&format!(
            "/api/events/application/details/{}",
            event_id
        )))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["fields"][1]["type"], "number");
    assert_eq!(body["fields"][1]["required"], false);

    let response = app
        .clone()
        .oneshot(make_post_request(
            &format!("/api/events/apply/{}", event_id),
            json!({"name": "Ada", "rating": 1850}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Missing required field
    let response = app
        .clone()
        .oneshot(make_post_request(
            &format!("/api/events/apply/{}", event_id),
            json!({"rating": 1200}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(make_get_request(&format!(
            "/api/events/application/responses/{}",
            event_id
        )))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["responses"].as_array().unwrap().len(), 1);
    assert_eq!(body["responses"][0]["rating"], 1850.0);

    let response = app
        .clone()
        .oneshot(make_get_request(&format!(
            "/api/events/download_responses/{}",
            event_id
        )))
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Spring Open_responses.csv\""
    );

    let response = app
        .clone()
        .oneshot(make_post_request(
            &format!("/api/events/close_registrations/{}", event_id),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(make_get_request(&format!(
            "/api/events/application/{}",
            event_id
        )))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["exists"], false);

    let response = app
        .oneshot(make_post_request(
            &format!("/api/events/apply/{}", event_id),
            json!({"name": "Late"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_event_for_unknown_club() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir).await;

    let response = app
        .oneshot(make_post_request(
            "/api/events/create",
            json!({
                "clubId": 7,
                "eventName": "Spring Open",
                "eventFields": [{"label": "Name", "type": "text", "required": true}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
