//! Credential exchange endpoint.
//!
//! `POST /auth` reads an HTTP Basic `Authorization` header and exchanges the
//! credentials for a token at the configured identity provider.

use aw_connectors::Credentials;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

/// Creates auth routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth", post(authenticate))
}

/// Token issued in exchange for valid credentials.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Session token (authn flow) or access token (OAuth flow).
    pub token: String,
    /// "session" or the OAuth token type, usually "Bearer".
    pub token_type: String,
    /// Lifetime in seconds, when the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// Exchange HTTP Basic credentials for a provider token.
#[utoipa::path(
    post,
    path = "/auth",
    responses(
        (status = 200, description = "Credentials accepted", body = TokenResponse),
        (status = 401, description = "Missing, malformed or rejected credentials", body = crate::error::ErrorResponse),
        (status = 502, description = "Identity provider unavailable", body = crate::error::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let credentials = parse_basic_credentials(&headers).ok_or_else(|| {
        warn!("Rejected /auth request with missing or malformed Basic credentials");
        ApiError::InvalidCredentials
    })?;

    let issued = state
        .identity
        .authenticate(&credentials)
        .await
        .map_err(|e| {
            warn!(
                username = %credentials.username,
                gateway = state.identity.name(),
                error = %e,
                "Identity exchange failed"
            );
            ApiError::from(e)
        })?;

    info!(
        username = %credentials.username,
        flow = %state.identity.flow(),
        "Credentials exchanged for token"
    );

    Ok(Json(TokenResponse {
        token: issued.token.expose_secret().to_string(),
        token_type: issued.token_type,
        expires_in: issued.expires_in,
    }))
}

/// Decodes `Authorization: Basic <base64(username:password)>`.
///
/// The scheme is matched case-insensitively and the decoded text is split at
/// the first colon, so passwords may contain colons.
pub fn parse_basic_credentials(headers: &HeaderMap) -> Option<Credentials> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials::new(username, password))
}
