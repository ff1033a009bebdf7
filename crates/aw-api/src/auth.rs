//! Bearer token extraction for protected routes.

use aw_connectors::VerifiedToken;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Caller whose bearer token the identity provider accepted.
///
/// Use as a handler argument to require `Authorization: Bearer <token>`.
/// A missing, malformed or rejected token becomes
/// [`ApiError::InvalidCredentials`]; a provider that cannot answer becomes
/// [`ApiError::BadGateway`].
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller(pub VerifiedToken);

impl AuthenticatedCaller {
    pub fn subject(&self) -> &str {
        &self.0.subject
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(parts).ok_or_else(|| {
            debug!("Request without bearer token");
            ApiError::InvalidCredentials
        })?;

        let verified = app_state
            .identity
            .verify_token(token)
            .await
            .map_err(|e| {
                warn!(error = %e, "Bearer token verification failed");
                ApiError::from(e)
            })?;

        debug!(subject = %verified.subject, "Bearer token accepted");
        Ok(AuthenticatedCaller(verified))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
