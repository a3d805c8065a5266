use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use availability_cell::router::availability_routes;
use shared_store::AppState;
use shared_utils::test_utils::TestConfig;

fn create_test_app() -> (Router, Arc<AppState>) {
    let state = TestConfig::default().to_state();
    let app = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/availability", availability_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()));
    (app, state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn patch_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Register an account and log it in, returning (user id, token).
async fn register_and_login(app: &Router, username: &str, roles: Value) -> (String, String) {
    let profession = if roles.as_array().unwrap().contains(&json!("PROVIDER")) {
        json!("General practice")
    } else {
        Value::Null
    };
    let (status, body) = send(
        app,
        post_json(
            "/auth/register",
            None,
            json!({
                "username": username,
                "password": "correct-horse-battery",
                "email": format!("{}@example.com", username),
                "roles": roles,
                "profession": profession,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let user_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        post_json(
            "/auth/login",
            None,
            json!({
                "username": username,
                "password": "correct-horse-battery",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    let token = body["token"].as_str().unwrap().to_string();

    (user_id, token)
}

#[tokio::test]
async fn test_booking_lifecycle_end_to_end() {
    let (app, _state) = create_test_app();

    let (provider_id, provider_token) =
        register_and_login(&app, "dr-jones", json!(["PROVIDER"])).await;
    let (patient_id, patient_token) = register_and_login(&app, "alice", json!(["PATIENT"])).await;
    let (_, admin_token) = register_and_login(&app, "root", json!(["ADMIN"])).await;

    // Provider publishes a two-hour window, which lands as two slots.
    let (status, slots) = send(
        &app,
        post_json(
            "/availability/create",
            Some(&provider_token),
            json!({
                "date": "2026-01-20",
                "start_time": "09:00:00",
                "end_time": "11:00:00",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(slots.as_array().unwrap().len(), 2);

    // The patient sees both slots open.
    let uri = format!(
        "/availability/all?provider_id={}&from=2026-01-20&to=2026-01-20",
        provider_id
    );
    let (status, listed) = send(&app, get_with_token(&uri, &patient_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert!(listed[0]["is_available"].as_bool().unwrap());
    assert!(listed[1]["is_available"].as_bool().unwrap());

    // Book the second hour.
    let (status, appointment) = send(
        &app,
        post_json(
            "/appointments",
            Some(&patient_token),
            json!({
                "provider_id": provider_id,
                "date": "2026-01-20",
                "start_time": "10:00:00",
                "end_time": "11:00:00",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appointment["status"], "BOOKED");
    assert_eq!(appointment["patient_id"], patient_id);
    let appointment_id = appointment["id"].as_str().unwrap().to_string();

    // The booked slot is no longer offered.
    let (_, listed) = send(&app, get_with_token(&uri, &patient_token)).await;
    let booked_slot = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["start_time"] == "10:00:00")
        .unwrap();
    assert!(!booked_slot["is_available"].as_bool().unwrap());

    // A second patient booking the same hour is turned away.
    let (_, bob_token) = register_and_login(&app, "bob", json!(["PATIENT"])).await;
    let (status, body) = send(
        &app,
        post_json(
            "/appointments",
            Some(&bob_token),
            json!({
                "provider_id": provider_id,
                "date": "2026-01-20",
                "start_time": "10:00:00",
                "end_time": "11:00:00",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Selected time is not available");

    // Cancelling restores the slot.
    let (status, cancelled) = send(
        &app,
        patch_with_token(
            &format!("/appointments/{}/cancel", appointment_id),
            &patient_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (_, listed) = send(&app, get_with_token(&uri, &patient_token)).await;
    let restored_slot = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["start_time"] == "10:00:00")
        .unwrap();
    assert!(restored_slot["is_available"].as_bool().unwrap());

    // A second cancellation is rejected as a conflict.
    let (status, body) = send(
        &app,
        patch_with_token(
            &format!("/appointments/{}/cancel", appointment_id),
            &patient_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Appointment has already been cancelled");

    // The admin audit still sees the cancelled record.
    let (status, all) = send(&app, get_with_token("/appointments/all", &admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["status"], "CANCELLED");
}

#[tokio::test]
async fn test_appointments_require_authentication() {
    let (app, _state) = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/appointments")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("GET")
        .uri("/appointments")
        .header("authorization", "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_my_appointments_scoped_to_caller() {
    let (app, _state) = create_test_app();

    let (provider_id, provider_token) =
        register_and_login(&app, "dr-jones", json!(["PROVIDER"])).await;
    let (_, alice_token) = register_and_login(&app, "alice", json!(["PATIENT"])).await;
    let (_, bob_token) = register_and_login(&app, "bob", json!(["PATIENT"])).await;

    send(
        &app,
        post_json(
            "/availability/create",
            Some(&provider_token),
            json!({
                "date": "2026-01-20",
                "start_time": "09:00:00",
                "end_time": "11:00:00",
            }),
        ),
    )
    .await;

    for (token, start, end) in [
        (&alice_token, "09:00:00", "10:00:00"),
        (&bob_token, "10:00:00", "11:00:00"),
    ] {
        let (status, _) = send(
            &app,
            post_json(
                "/appointments",
                Some(token),
                json!({
                    "provider_id": provider_id,
                    "date": "2026-01-20",
                    "start_time": start,
                    "end_time": end,
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, mine) = send(&app, get_with_token("/appointments", &alice_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["start_time"], "09:00:00");

    let (_, providers) = send(&app, get_with_token("/appointments", &provider_token)).await;
    assert_eq!(providers.as_array().unwrap().len(), 2);

    // Patients cannot use the audit endpoint.
    let (status, _) = send(&app, get_with_token("/appointments/all", &alice_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
