//! `/auth` endpoint integration tests.

use aw_api::{routes, state::AppState};
use aw_connectors::MockIdentityGateway;
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

use super::common::{
    auth_request, basic_header, create_test_router, create_test_state_with, send_request,
};

fn assert_invalid_credentials(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_valid_credentials_return_token() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) = send_request(
        app,
        auth_request(Some(&basic_header("jdoe", "correct-horse"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "mock-session-jdoe");
    assert_eq!(body["tokenType"], "session");
    assert!(body.get("expiresIn").is_none());
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) =
        send_request(app, auth_request(Some(&basic_header("jdoe", "wrong")))).await;

    assert_invalid_credentials(status, &body);
}

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) = send_request(app, auth_request(None)).await;

    assert_invalid_credentials(status, &body);
}

#[tokio::test]
async fn test_malformed_headers_are_unauthorized() {
    let (app, _state) = create_test_router();

    for value in ["Bearer abc", "Basic %%%", "Basic bm8tY29sb24="] {
        let (status, body): (StatusCode, Value) =
            send_request(app.clone(), auth_request(Some(value))).await;
        assert_invalid_credentials(status, &body);
    }
}

#[tokio::test]
async fn test_oauth_flow_token_shape() {
    let gateway = MockIdentityGateway::new("mock").with_flow(aw_connectors::AuthFlow::Oauth);
    gateway.add_user("alice", "p:w").await;
    let state: AppState = create_test_state_with(1, Arc::new(gateway));
    let app = routes::create_router(state);

    let (status, body): (StatusCode, Value) =
        send_request(app, auth_request(Some(&basic_header("alice", "p:w")))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "mock-access-alice");
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 3600);
}

#[tokio::test]
async fn test_unreachable_provider_is_bad_gateway() {
    let gateway = MockIdentityGateway::with_sample_data("mock");
    gateway.set_unavailable(true);
    let app = routes::create_router(create_test_state_with(1, Arc::new(gateway)));

    let (status, body): (StatusCode, Value) = send_request(
        app,
        auth_request(Some(&basic_header("jdoe", "correct-horse"))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "BAD_GATEWAY");
}

#[tokio::test]
async fn test_auth_rejects_get() {
    let (app, _state) = create_test_router();

    let response = tower::ServiceExt::oneshot(app, super::common::get_request("/auth"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
