//! Identity gateway trait and shared connector types.

use crate::secure_string::SecureString;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while talking to an identity provider.
#[derive(Error, Debug, Clone)]
pub enum ConnectorError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConnectorError {
    /// Whether the provider rejected the credentials themselves, as opposed
    /// to the exchange failing for some other reason.
    pub fn is_credential_rejection(&self) -> bool {
        matches!(
            self,
            ConnectorError::AuthenticationFailed(_) | ConnectorError::AuthorizationDenied(_)
        )
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// HTTP settings for a remote provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Connector name/identifier.
    pub name: String,
    /// Base URL for the API (e.g. `https://myorg.okta.com`).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Whether to verify TLS certificates.
    pub verify_tls: bool,
    /// Additional headers to include.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Username and password extracted from an HTTP Basic credential.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecureString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecureString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Which exchange a gateway performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthFlow {
    /// Primary authentication producing a session token.
    #[default]
    Authn,
    /// OAuth 2.0 resource-owner password grant producing an access token.
    Oauth,
}

impl std::fmt::Display for AuthFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthFlow::Authn => write!(f, "authn"),
            AuthFlow::Oauth => write!(f, "oauth"),
        }
    }
}

impl std::str::FromStr for AuthFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "authn" | "session" => Ok(AuthFlow::Authn),
            "oauth" | "token" => Ok(AuthFlow::Oauth),
            _ => Err(format!("Invalid auth flow: {}. Must be one of: authn, oauth", s)),
        }
    }
}

/// Token issued by the identity provider on a successful exchange.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Opaque token value (session token or access token).
    pub token: SecureString,
    /// Token type, e.g. "session" or "Bearer".
    pub token_type: String,
    /// Lifetime in seconds, when the provider reports one.
    pub expires_in: Option<u64>,
}

/// Caller identity recovered from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// User the token was issued to.
    pub subject: String,
    /// Granted scopes, space separated, when the provider reports them.
    pub scope: Option<String>,
    /// Expiry as seconds since the Unix epoch, when the provider reports one.
    pub expires_at: Option<i64>,
}

impl VerifiedToken {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            scope: None,
            expires_at: None,
        }
    }
}

/// Exchanges user credentials for a token at a remote identity provider.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Returns the gateway name.
    fn name(&self) -> &str;

    /// Returns the exchange this gateway performs.
    fn flow(&self) -> AuthFlow;

    /// Authenticates `credentials`, returning the issued token.
    ///
    /// A rejection of the credentials is reported as
    /// [`ConnectorError::AuthenticationFailed`].
    async fn authenticate(&self, credentials: &Credentials) -> ConnectorResult<IssuedToken>;

    /// Checks a bearer token presented by a caller.
    ///
    /// An unknown, expired or revoked token is reported as
    /// [`ConnectorError::AuthenticationFailed`].
    async fn verify_token(&self, token: &str) -> ConnectorResult<VerifiedToken>;
}
