//! Health check, OpenAPI document and request-id integration tests.
//!
//! Run with: `cargo test -p receipt-api --test health_test`

mod helpers;

use axum::http::StatusCode;
use helpers::{setup_test_app, TestAppBuilder};
use receipt_services::test_helpers::MockStorage;
use serde_json::Value;

#[tokio::test]
async fn test_health_check_healthy() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
}

#[tokio::test]
async fn test_health_check_database_down_is_unavailable() {
    let app = setup_test_app().await;
    app.repository.set_healthy(false);

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "unhealthy");
    assert!(body["database"]
        .as_str()
        .unwrap_or_default()
        .starts_with("unhealthy:"));
}

#[tokio::test]
async fn test_health_check_storage_down_is_degraded() {
    let app = TestAppBuilder::new()
        .storage(MockStorage::failing())
        .build()
        .await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_lists_receipt_routes() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"]["/api/v0/receipts"]["post"].is_object());
    assert!(doc["paths"]["/api/v0/receipts"]["get"].is_object());
    assert!(doc["paths"]["/api/v0/receipts/{id}"]["get"].is_object());
    assert!(doc["paths"]["/health"]["get"].is_object());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/health")
        .add_header("x-request-id", "trace-abc-123")
        .await;

    assert_eq!(response.header("x-request-id"), "trace-abc-123");
}

#[tokio::test]
async fn test_request_id_is_generated_when_missing() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    let id = response.header("x-request-id");
    assert!(!id.is_empty());
}
