//! Health check endpoint integration tests.

use axum::http::StatusCode;
use serde_json::Value;
use tower::ServiceExt;

use super::common::{
    create_server_router, create_test_router, create_test_state, get_request, send_request,
    COUNT_PER_UNIT,
};

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) = send_request(app, get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptimeSeconds"].is_u64());
}

#[tokio::test]
async fn test_ready_endpoint_reports_snapshot() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) = send_request(app, get_request("/ready")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["totalAssets"], COUNT_PER_UNIT * 3);
    for unit in ["ROADSIDE", "RETAIL", "TRANSPORT"] {
        assert_eq!(body["assetsByUnit"][unit], COUNT_PER_UNIT, "unit {}", unit);
    }
}

#[tokio::test]
async fn test_middleware_sets_request_id_and_security_headers() {
    let app = create_server_router(create_test_state());

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = create_server_router(create_test_state());
    let request = axum::extract::Request::builder()
        .uri("/health")
        .header("X-Request-Id", "trace-me-123")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = create_server_router(create_test_state());

    let (status, body): (StatusCode, Value) =
        send_request(app, get_request("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/assets").is_some());
    assert!(body["paths"].get("/auth").is_some());
}
