//! Okta identity gateways.
//!
//! Two alternative exchanges are supported:
//! - [`OktaAuthnGateway`] calls the primary authentication API
//!   (`/api/v1/authn`) and returns the session token.
//! - [`OktaTokenGateway`] calls an authorization server's token endpoint with
//!   the resource-owner password grant and returns the access token.
//!
//! Both verify caller bearer tokens through the authorization server's
//! introspection endpoint, which needs the OAuth client credentials.

use crate::http::HttpClient;
use crate::secure_string::SecureString;
use crate::traits::{
    AuthFlow, ConnectorConfig, ConnectorError, ConnectorResult, Credentials, IdentityGateway,
    IssuedToken, VerifiedToken,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Okta gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OktaConfig {
    #[serde(flatten)]
    pub connector: ConnectorConfig,
    /// Authorization server id used by the OAuth flow.
    #[serde(default = "default_authorization_server")]
    pub authorization_server: String,
    /// OAuth client id (OAuth flow only).
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret (OAuth flow only).
    #[serde(default)]
    pub client_secret: SecureString,
    /// Scopes requested by the OAuth flow.
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_authorization_server() -> String {
    "default".to_string()
}

fn default_scope() -> String {
    "openid".to_string()
}

impl OktaConfig {
    /// Creates a configuration for the given connector settings with the
    /// default authorization server and no OAuth client.
    pub fn new(connector: ConnectorConfig) -> Self {
        Self {
            connector,
            authorization_server: default_authorization_server(),
            client_id: String::new(),
            client_secret: SecureString::default(),
            scope: default_scope(),
        }
    }

    /// Sets the OAuth client credentials.
    pub fn with_client(mut self, client_id: impl Into<String>, secret: impl Into<SecureString>) -> Self {
        self.client_id = client_id.into();
        self.client_secret = secret.into();
        self
    }

    fn has_client(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    fn oauth_path(&self, endpoint: &str) -> String {
        format!("/oauth2/{}/v1/{}", self.authorization_server, endpoint)
    }
}

// ============================================================================
// Token introspection (RFC 7662)
// ============================================================================

async fn introspect(
    client: &HttpClient,
    config: &OktaConfig,
    token: &str,
) -> ConnectorResult<VerifiedToken> {
    if !config.has_client() {
        return Err(ConnectorError::ConfigError(
            "Token verification requires client_id and client_secret".to_string(),
        ));
    }

    let form = [("token", token), ("token_type_hint", "access_token")];
    let response: IntrospectionResponse = client
        .post_form_basic(
            &config.oauth_path("introspect"),
            &form,
            &config.client_id,
            config.client_secret.expose_secret(),
        )
        .await
        .map_err(|e| match e {
            // A 401 here rejects our client, not the caller's token.
            ConnectorError::AuthenticationFailed(msg) | ConnectorError::AuthorizationDenied(msg) => {
                ConnectorError::ConfigError(format!("Introspection client rejected: {}", msg))
            }
            other => other,
        })?;

    if !response.active {
        debug!("Introspected token is not active");
        return Err(ConnectorError::AuthenticationFailed(
            "Token is not active".to_string(),
        ));
    }

    let subject = response.username.or(response.sub).ok_or_else(|| {
        ConnectorError::InvalidResponse("Active token without username or sub".into())
    })?;

    Ok(VerifiedToken {
        subject,
        scope: response.scope,
        expires_at: response.exp,
    })
}

#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    active: bool,
    username: Option<String>,
    sub: Option<String>,
    scope: Option<String>,
    exp: Option<i64>,
}

// ============================================================================
// Primary authentication (session token)
// ============================================================================

/// Exchanges credentials for an Okta session token.
pub struct OktaAuthnGateway {
    config: OktaConfig,
    client: HttpClient,
}

impl OktaAuthnGateway {
    pub fn new(config: OktaConfig) -> ConnectorResult<Self> {
        let client = HttpClient::new(config.connector.clone())?;
        info!(
            base_url = %config.connector.base_url,
            "Okta authn gateway initialized"
        );
        Ok(Self { config, client })
    }
}

#[async_trait]
impl IdentityGateway for OktaAuthnGateway {
    fn name(&self) -> &str {
        &self.config.connector.name
    }

    fn flow(&self) -> AuthFlow {
        AuthFlow::Authn
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn authenticate(&self, credentials: &Credentials) -> ConnectorResult<IssuedToken> {
        let request = AuthnRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
            options: AuthnOptions {
                multi_optional_factor_enroll: false,
                warn_before_password_expired: false,
            },
        };

        let response: AuthnResponse = self.client.post_json("/api/v1/authn", &request).await?;

        if response.status != "SUCCESS" {
            warn!(status = %response.status, "Okta authn did not complete");
            return Err(ConnectorError::AuthenticationFailed(format!(
                "Authentication status {}",
                response.status
            )));
        }

        let token = response.session_token.ok_or_else(|| {
            ConnectorError::InvalidResponse("Missing sessionToken in authn response".into())
        })?;

        Ok(IssuedToken {
            token: SecureString::new(token),
            token_type: "session".to_string(),
            expires_in: None,
        })
    }

    async fn verify_token(&self, token: &str) -> ConnectorResult<VerifiedToken> {
        introspect(&self.client, &self.config, token).await
    }
}

#[derive(Serialize)]
struct AuthnRequest<'a> {
    username: &'a str,
    password: &'a str,
    options: AuthnOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthnOptions {
    multi_optional_factor_enroll: bool,
    warn_before_password_expired: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthnResponse {
    status: String,
    session_token: Option<String>,
}

// ============================================================================
// OAuth 2.0 password grant (access token)
// ============================================================================

/// Exchanges credentials for an OAuth 2.0 access token.
pub struct OktaTokenGateway {
    config: OktaConfig,
    client: HttpClient,
}

impl OktaTokenGateway {
    pub fn new(config: OktaConfig) -> ConnectorResult<Self> {
        if !config.has_client() {
            return Err(ConnectorError::ConfigError(
                "OAuth flow requires client_id and client_secret".to_string(),
            ));
        }
        let client = HttpClient::new(config.connector.clone())?;
        info!(
            base_url = %config.connector.base_url,
            authorization_server = %config.authorization_server,
            "Okta token gateway initialized"
        );
        Ok(Self { config, client })
    }

    fn token_path(&self) -> String {
        self.config.oauth_path("token")
    }
}

#[async_trait]
impl IdentityGateway for OktaTokenGateway {
    fn name(&self) -> &str {
        &self.config.connector.name
    }

    fn flow(&self) -> AuthFlow {
        AuthFlow::Oauth
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn authenticate(&self, credentials: &Credentials) -> ConnectorResult<IssuedToken> {
        let form = [
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.expose_secret()),
            ("scope", self.config.scope.as_str()),
        ];

        let response: TokenResponse = self
            .client
            .post_form_basic(
                &self.token_path(),
                &form,
                &self.config.client_id,
                self.config.client_secret.expose_secret(),
            )
            .await
            .map_err(|e| match e {
                // Okta answers a wrong password with 400 invalid_grant.
                ConnectorError::InvalidRequest(body) if body.contains("invalid_grant") => {
                    ConnectorError::AuthenticationFailed("invalid_grant".to_string())
                }
                other => other,
            })?;

        Ok(IssuedToken {
            token: SecureString::new(response.access_token),
            token_type: response.token_type,
            expires_in: response.expires_in,
        })
    }

    async fn verify_token(&self, token: &str) -> ConnectorResult<VerifiedToken> {
        introspect(&self.client, &self.config, token).await
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: Option<u64>,
}
