//! Response types for the health endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Liveness response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall status ("healthy").
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the router was built.
    pub uptime_seconds: u64,
}

/// Readiness response, summarising the loaded snapshot.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub status: String,
    pub total_assets: usize,
    /// Asset count keyed by business unit wire name.
    pub assets_by_unit: BTreeMap<String, usize>,
}
