//! Asset query endpoints.

use aw_core::{Address, Asset, AssetId};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthenticatedCaller;
use crate::error::ApiError;
use crate::state::AppState;

/// Creates asset routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assets))
        .route("/:id", get(get_asset))
}

// ============================================================================
// DTOs
// ============================================================================

/// Query parameters for listing assets.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAssetsQuery {
    /// Restrict the listing to one business unit, e.g. `RETAIL`.
    pub unit: Option<String>,
}

/// Asset response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub id: AssetId,
    pub business_unit: String,
    /// RFC 3339 timestamp with millisecond precision in Europe/London.
    pub activation_date: String,
    pub format: String,
    pub orientation: String,
    pub address: AddressResponse,
}

/// Address response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub town: String,
    pub county: String,
    pub postcode: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// List assets, optionally filtered by business unit.
#[utoipa::path(
    get,
    path = "/assets",
    params(ListAssetsQuery),
    responses(
        (status = 200, description = "Assets in ascending id order", body = Vec<AssetResponse>),
        (status = 400, description = "Unknown business unit or malformed query", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or rejected bearer token", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Assets"
)]
pub async fn list_assets(
    caller: AuthenticatedCaller,
    State(state): State<AppState>,
    query: Result<Query<ListAssetsQuery>, QueryRejection>,
) -> Result<Json<Vec<AssetResponse>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    debug!(subject = %caller.subject(), "Asset listing requested");

    let assets = match query.unit.as_deref() {
        Some(unit) => state.asset_store.find_by_business_unit_name(unit)?,
        None => state.asset_store.find_all(),
    };
    debug!(unit = ?query.unit, returned = assets.len(), "Listing assets");

    Ok(Json(assets.iter().map(asset_to_response).collect()))
}

/// Get an asset by id.
#[utoipa::path(
    get,
    path = "/assets/{id}",
    params(("id" = u64, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Asset found", body = AssetResponse),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or rejected bearer token", body = crate::error::ErrorResponse),
        (status = 404, description = "Asset not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Assets"
)]
pub async fn get_asset(
    caller: AuthenticatedCaller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AssetResponse>, ApiError> {
    let id = parse_asset_id(&id)?;
    debug!(subject = %caller.subject(), id, "Asset lookup requested");
    let asset = state
        .asset_store
        .find_by_id(id)
        .ok_or_else(|| ApiError::NotFound(format!("Asset {} not found", id)))?;

    Ok(Json(asset_to_response(&asset)))
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_asset_id(raw: &str) -> Result<AssetId, ApiError> {
    raw.parse::<AssetId>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid asset id: {}", raw)))
}

fn address_to_response(address: &Address) -> AddressResponse {
    AddressResponse {
        address_line1: address.address_line1.clone(),
        address_line2: address.address_line2.clone(),
        town: address.town.clone(),
        county: address.county.clone(),
        postcode: address.postcode.clone(),
    }
}

pub(crate) fn asset_to_response(asset: &Asset) -> AssetResponse {
    AssetResponse {
        id: asset.id,
        business_unit: asset.business_unit.to_string(),
        activation_date: asset
            .activation_date
            .to_rfc3339_opts(SecondsFormat::Millis, false),
        format: asset.format.to_string(),
        orientation: asset.orientation.to_string(),
        address: address_to_response(&asset.address),
    }
}
