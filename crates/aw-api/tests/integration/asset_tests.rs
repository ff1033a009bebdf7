//! Asset endpoint integration tests.

use aw_api::routes::assets::AssetResponse;
use aw_api::state::AppState;
use aw_connectors::MockIdentityGateway;
use aw_core::AssetStoreBuilder;
use axum::http::StatusCode;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use super::common::{
    auth_request, authed_get_request, basic_header, bearer_get_request, create_server_router,
    create_test_router, create_test_state_with, get_request, send_request, test_catalog,
    test_gateway, COUNT_PER_UNIT,
};

const WINDOW_START: &str = "2000-01-01T00:00:00Z";
const WINDOW_END: &str = "2021-01-01T00:00:00Z";

#[tokio::test]
async fn test_list_returns_every_asset() {
    let (app, _state) = create_test_router();

    let (status, assets): (StatusCode, Vec<AssetResponse>) =
        send_request(app, authed_get_request("/assets")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(assets.len(), COUNT_PER_UNIT * 3);

    let ids: Vec<u64> = assets.iter().map(|a| a.id).collect();
    let unique: HashSet<u64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "ascending ids");
}

#[tokio::test]
async fn test_activation_dates_are_within_window() {
    let (app, _state) = create_test_router();
    let start = chrono::DateTime::parse_from_rfc3339(WINDOW_START).unwrap();
    let end = chrono::DateTime::parse_from_rfc3339(WINDOW_END).unwrap();

    let (_, assets): (StatusCode, Vec<AssetResponse>) =
        send_request(app, authed_get_request("/assets")).await;

    for asset in assets {
        let date = chrono::DateTime::parse_from_rfc3339(&asset.activation_date)
            .unwrap_or_else(|e| panic!("{}: {}", asset.activation_date, e));
        assert!(date >= start && date < end, "{}", asset.activation_date);
        let offset = date.offset().local_minus_utc();
        assert!(offset == 0 || offset == 3600, "London offset, got {}", offset);
    }
}

#[tokio::test]
async fn test_addresses_belong_to_asset_unit() {
    let (app, _state) = create_test_router();
    let catalog = test_catalog();

    let (_, assets): (StatusCode, Vec<AssetResponse>) =
        send_request(app, authed_get_request("/assets")).await;

    for asset in assets {
        let unit = asset.business_unit.parse().unwrap();
        let line1s: Vec<&str> = catalog
            .addresses_for(unit)
            .iter()
            .map(|a| a.address_line1.as_str())
            .collect();
        assert!(line1s.contains(&asset.address.address_line1.as_str()));
    }
}

#[tokio::test]
async fn test_filter_by_unit() {
    let (app, _state) = create_test_router();

    let (status, assets): (StatusCode, Vec<AssetResponse>) =
        send_request(app, authed_get_request("/assets?unit=RETAIL")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(assets.len(), COUNT_PER_UNIT);
    assert!(assets.iter().all(|a| a.business_unit == "RETAIL"));
}

#[tokio::test]
async fn test_lowercase_unit_is_bad_request() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) =
        send_request(app, authed_get_request("/assets?unit=transport")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Invalid business unit: transport"), "{}", message);
}

#[tokio::test]
async fn test_known_unit_on_empty_store_is_empty_list() {
    let state = AppState::new(AssetStoreBuilder::new().build(), test_gateway());
    let app = aw_api::routes::create_router(state);

    let (status, assets): (StatusCode, Vec<AssetResponse>) =
        send_request(app, authed_get_request("/assets?unit=RETAIL")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(assets.is_empty());
}

#[tokio::test]
async fn test_repeated_unit_param_is_json_bad_request() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) = send_request(
        app,
        authed_get_request("/assets?unit=RETAIL&unit=ROADSIDE"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_unknown_unit_is_bad_request() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) =
        send_request(app, authed_get_request("/assets?unit=BOGUS")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Invalid business unit: BOGUS"), "{}", message);
}

#[tokio::test]
async fn test_filtered_sizes_sum_to_total() {
    let (app, _state) = create_test_router();

    let mut total = 0;
    for unit in ["ROADSIDE", "RETAIL", "TRANSPORT"] {
        let (_, assets): (StatusCode, Vec<AssetResponse>) = send_request(
            app.clone(),
            authed_get_request(&format!("/assets?unit={}", unit)),
        )
        .await;
        total += assets.len();
    }

    let (_, all): (StatusCode, Vec<AssetResponse>) =
        send_request(app, authed_get_request("/assets")).await;
    assert_eq!(total, all.len());
}

#[tokio::test]
async fn test_get_asset_by_id() {
    let (app, state) = create_test_router();
    let expected = state.asset_store.find_all()[4].clone();

    let (status, asset): (StatusCode, AssetResponse) =
        send_request(app, authed_get_request(&format!("/assets/{}", expected.id))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(asset.id, expected.id);
    assert_eq!(asset.business_unit, expected.business_unit.to_string());
    assert_eq!(asset.format, expected.format.to_string());
}

#[tokio::test]
async fn test_get_missing_asset_is_not_found() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) =
        send_request(app, authed_get_request("/assets/999999")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_non_numeric_id_is_bad_request() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) =
        send_request(app, authed_get_request("/assets/abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_json_field_order() {
    let (app, _state) = create_test_router();

    let (_, body) = super::common::send_request_raw(app, authed_get_request("/assets/1")).await;

    let keys = [
        "\"id\"",
        "\"businessUnit\"",
        "\"activationDate\"",
        "\"format\"",
        "\"orientation\"",
        "\"address\"",
    ];
    let positions: Vec<usize> = keys.iter().map(|k| body.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", body);
}

#[tokio::test]
async fn test_larger_population() {
    let gateway = MockIdentityGateway::new("mock").with_token("roadside-token", "ops");
    let state = create_test_state_with(10, Arc::new(gateway));
    let app = aw_api::routes::create_router(state);

    let (_, assets): (StatusCode, Vec<AssetResponse>) =
        send_request(app, bearer_get_request("/assets?unit=ROADSIDE", "roadside-token")).await;

    assert_eq!(assets.len(), 10);
}

// ============================================================================
// Bearer token enforcement
// ============================================================================

#[tokio::test]
async fn test_list_without_token_is_unauthorized() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) = send_request(app, get_request("/assets")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_get_without_token_is_unauthorized() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) = send_request(app, get_request("/assets/1")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let (app, _state) = create_test_router();

    let (status, body): (StatusCode, Value) =
        send_request(app, bearer_get_request("/assets?unit=RETAIL", "forged")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_basic_credentials_do_not_open_assets() {
    let (app, _state) = create_test_router();
    let request = axum::extract::Request::builder()
        .uri("/assets")
        .header("Authorization", basic_header("jdoe", "correct-horse"))
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, _body): (StatusCode, Value) = send_request(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_auth_opens_assets() {
    let app = create_server_router(create_test_state_with(COUNT_PER_UNIT, test_gateway()));

    let (status, issued): (StatusCode, Value) = send_request(
        app.clone(),
        auth_request(Some(&basic_header("jdoe", "correct-horse"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = issued["token"].as_str().unwrap();

    let (status, assets): (StatusCode, Vec<AssetResponse>) =
        send_request(app, bearer_get_request("/assets", token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(assets.len(), COUNT_PER_UNIT * 3);
}

#[tokio::test]
async fn test_provider_outage_is_bad_gateway() {
    let gateway = test_gateway();
    let app = aw_api::routes::create_router(create_test_state_with(COUNT_PER_UNIT, gateway.clone()));
    gateway.set_unavailable(true);

    let (status, body): (StatusCode, Value) =
        send_request(app, authed_get_request("/assets")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "BAD_GATEWAY");
}
