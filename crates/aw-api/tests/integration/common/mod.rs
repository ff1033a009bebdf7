//! Common test utilities for integration tests.

use aw_api::{routes, state::AppState, ApiServer};
use aw_connectors::{IdentityGateway, MockIdentityGateway};
use aw_core::{Address, AddressCatalog, AddressRecord, AssetStoreBuilder, BusinessUnit};
use axum::{
    body::Body,
    http::{Method, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::StdRng, SeedableRng};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

/// Assets generated per business unit by [`create_test_router`].
pub const COUNT_PER_UNIT: usize = 3;

/// Bearer token accepted by [`test_gateway`].
pub const TEST_TOKEN: &str = "test-token";

/// Two addresses for every business unit.
pub fn test_catalog() -> AddressCatalog {
    let records = BusinessUnit::ALL
        .iter()
        .flat_map(|unit| {
            (1..=2).map(move |n| AddressRecord {
                address: Address::new(
                    format!("{} {} Road", n, unit.as_str().to_lowercase()),
                    "Bristol",
                    "Avon",
                    format!("BS{} 1AA", n),
                ),
                business_unit: unit.as_str().to_string(),
            })
        })
        .collect();
    AddressCatalog::from_records(records).expect("test catalog is valid")
}

/// Builds state with `count_per_unit` seeded assets per unit and the given
/// identity gateway.
pub fn create_test_state_with(
    count_per_unit: usize,
    identity: Arc<dyn IdentityGateway>,
) -> AppState {
    let mut builder = AssetStoreBuilder::new();
    let mut rng = StdRng::seed_from_u64(7);
    builder
        .populate(count_per_unit, &test_catalog(), &mut rng)
        .expect("population succeeds");
    AppState::new(builder.build(), identity)
}

/// Mock gateway knowing `jdoe` / `correct-horse` and accepting [`TEST_TOKEN`].
pub fn test_gateway() -> Arc<MockIdentityGateway> {
    Arc::new(MockIdentityGateway::with_sample_data("mock").with_token(TEST_TOKEN, "jdoe"))
}

/// Builds state with [`COUNT_PER_UNIT`] assets per unit and [`test_gateway`].
pub fn create_test_state() -> AppState {
    create_test_state_with(COUNT_PER_UNIT, test_gateway())
}

/// Creates the bare route tree, without middleware.
pub fn create_test_router() -> (Router, AppState) {
    let state = create_test_state();
    let router = routes::create_router(state.clone());
    (router, state)
}

/// Creates the full server router, including middleware.
pub fn create_server_router(state: AppState) -> Router {
    ApiServer::with_state(state).router()
}

/// Helper to make GET requests.
pub fn get_request(uri: &str) -> axum::extract::Request<Body> {
    axum::extract::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to make GET requests carrying `Authorization: Bearer <token>`.
pub fn bearer_get_request(uri: &str, token: &str) -> axum::extract::Request<Body> {
    axum::extract::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Helper to make GET requests as the [`TEST_TOKEN`] holder.
pub fn authed_get_request(uri: &str) -> axum::extract::Request<Body> {
    bearer_get_request(uri, TEST_TOKEN)
}

/// Helper to make POST /auth requests with an optional Authorization header.
pub fn auth_request(authorization: Option<&str>) -> axum::extract::Request<Body> {
    let mut builder = axum::extract::Request::builder()
        .method(Method::POST)
        .uri("/auth");
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

/// Encodes `username:password` as a Basic Authorization header value.
pub fn basic_header(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, password))
    )
}

/// Sends request and parses JSON response.
pub async fn send_request<T: DeserializeOwned>(
    app: Router,
    request: axum::extract::Request<Body>,
) -> (StatusCode, T) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: T = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "Failed to parse response: {} - Body: {:?}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, parsed)
}

/// Sends request and returns raw response body.
pub async fn send_request_raw(
    app: Router,
    request: axum::extract::Request<Body>,
) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).to_string())
}
