// Admin HTTP surface: the 501 gate without the service-role credential,
// validation errors, the success envelope and the create-user rollback.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use agenda_admin_rust::gateway::AdminGateway;
use agenda_admin_rust::server::{app, AppState};
use common::{MockBackend, MockConfig};

fn state_sem_admin(mock: &MockBackend) -> AppState {
    AppState {
        gateway: mock.gateway(),
        admin: None,
    }
}

fn state_com_admin(mock: &MockBackend) -> AppState {
    AppState {
        gateway: mock.gateway(),
        admin: Some(
            AdminGateway::from_config(&mock.gateway_config_com_service_role())
                .expect("admin gateway"),
        ),
    }
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn every_admin_verb_answers_501_without_the_credential() {
    let mock = MockBackend::start().await;

    for (method, body) in [
        (Method::GET, None),
        (Method::POST, Some(json!({"email": "a@b.c", "password": "x"}))),
        (Method::DELETE, None),
    ] {
        let uri = if method == Method::DELETE {
            "/api/admin/users?id=123"
        } else {
            "/api/admin/users"
        };
        let response = app(state_sem_admin(&mock))
            .oneshot(request(method, uri, body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        let body = json_body(response).await;
        assert_eq!(body["error"], json!(true));
        assert_eq!(body["code"], json!("NOT_CONFIGURED"));
    }
    // The gate fires before any upstream call
    assert_eq!(mock.count("GET users"), 0);
    assert_eq!(mock.count("auth_create"), 0);
}

#[tokio::test]
async fn list_returns_profiles_in_the_success_envelope() {
    let mock = MockBackend::start_with(MockConfig {
        rows: [(
            "users".to_string(),
            vec![json!({
                "id": common::AUTH_USER_ID,
                "name": "Ana",
                "email": "ana@example.com",
                "role": "admin",
                "created_at": "2026-01-10T12:00:00Z"
            })],
        )]
        .into(),
        ..Default::default()
    })
    .await;

    let response = app(state_com_admin(&mock))
        .oneshot(request(Method::GET, "/api/admin/users", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"][0]["email"], json!("ana@example.com"));
    assert_eq!(body["data"][0]["role"], json!("admin"));
}

#[tokio::test]
async fn create_without_email_or_password_is_a_400() {
    let mock = MockBackend::start().await;

    for body in [
        json!({}),
        json!({"email": "a@b.c"}),
        json!({"password": "secret"}),
        json!({"email": "", "password": "secret"}),
    ] {
        let response = app(state_com_admin(&mock))
            .oneshot(request(Method::POST, "/api/admin/users", Some(body)))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], json!("BAD_REQUEST"));
    }
    assert_eq!(mock.count("auth_create"), 0);
}

#[tokio::test]
async fn create_answers_201_with_the_new_profile() {
    let mock = MockBackend::start().await;

    let response = app(state_com_admin(&mock))
        .oneshot(request(
            Method::POST,
            "/api/admin/users",
            Some(json!({
                "email": "novo@example.com",
                "password": "secret",
                "name": "Novo",
                "role": "user"
            })),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["email"], json!("novo@example.com"));
    assert_eq!(mock.count("auth_create"), 1);
    assert_eq!(mock.count("POST users"), 1);
}

#[tokio::test]
async fn failed_profile_insert_rolls_back_the_auth_user() {
    let mock = MockBackend::start_with(MockConfig {
        fail_insert: vec!["users".to_string()],
        ..Default::default()
    })
    .await;

    let response = app(state_com_admin(&mock))
        .oneshot(request(
            Method::POST,
            "/api/admin/users",
            Some(json!({"email": "novo@example.com", "password": "secret"})),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(mock.count("auth_create"), 1);
    assert_eq!(mock.count("auth_delete"), 1);
}

#[tokio::test]
async fn delete_requires_an_id_then_removes_both_records() {
    let mock = MockBackend::start().await;
    let state = state_com_admin(&mock);

    let sem_id = app(state.clone())
        .oneshot(request(Method::DELETE, "/api/admin/users", None))
        .await
        .expect("response");
    assert_eq!(sem_id.status(), StatusCode::BAD_REQUEST);
    assert_eq!(mock.count("auth_delete"), 0);

    let uri = format!("/api/admin/users?id={}", common::AUTH_USER_ID);
    let response = app(state)
        .oneshot(request(Method::DELETE, &uri, None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["deleted"], json!(common::AUTH_USER_ID));
    assert_eq!(mock.count("DELETE users"), 1);
    assert_eq!(mock.count("auth_delete"), 1);
}

#[tokio::test]
async fn health_reports_ok_while_the_gateway_answers() {
    let mock = MockBackend::start().await;

    let response = app(state_sem_admin(&mock))
        .oneshot(request(Method::GET, "/health", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["status"], json!("ok"));
}
