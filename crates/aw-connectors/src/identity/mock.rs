//! Mock identity gateway for testing.

use crate::traits::{
    AuthFlow, ConnectorError, ConnectorResult, Credentials, IdentityGateway, IssuedToken,
    VerifiedToken,
};
use crate::secure_string::SecureString;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct MockIdentityGateway {
    name: String,
    flow: AuthFlow,
    users: Arc<RwLock<HashMap<String, String>>>,
    /// Issued token value -> subject.
    tokens: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MockIdentityGateway {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flow: AuthFlow::Authn,
            users: Arc::new(RwLock::new(HashMap::new())),
            tokens: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn with_sample_data(name: &str) -> Self {
        let mut users = HashMap::new();
        users.insert("jdoe".to_string(), "correct-horse".to_string());
        users.insert("admin".to_string(), "s3cret".to_string());
        Self {
            users: Arc::new(RwLock::new(users)),
            ..Self::new(name)
        }
    }

    pub fn with_flow(mut self, flow: AuthFlow) -> Self {
        self.flow = flow;
        self
    }

    /// Accepts `token` as a bearer token for `subject`.
    pub fn with_token(mut self, token: &str, subject: &str) -> Self {
        self.tokens
            .get_mut()
            .insert(token.to_string(), subject.to_string());
        self
    }

    /// Revokes a previously issued or registered token.
    pub async fn revoke_token(&self, token: &str) {
        self.tokens.write().await.remove(token);
    }

    pub async fn add_user(&self, username: &str, password: &str) {
        self.users
            .write()
            .await
            .insert(username.to_string(), password.to_string());
    }

    /// Makes every subsequent exchange fail as if the provider were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityGateway for MockIdentityGateway {
    fn name(&self) -> &str {
        &self.name
    }

    fn flow(&self) -> AuthFlow {
        self.flow
    }

    async fn authenticate(&self, credentials: &Credentials) -> ConnectorResult<IssuedToken> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ConnectorError::ConnectionFailed(
                "mock provider unavailable".to_string(),
            ));
        }

        let users = self.users.read().await;
        match users.get(&credentials.username) {
            Some(password) if password == credentials.password.expose_secret() => {
                let issued = match self.flow {
                    AuthFlow::Authn => IssuedToken {
                        token: SecureString::new(format!("mock-session-{}", credentials.username)),
                        token_type: "session".to_string(),
                        expires_in: None,
                    },
                    AuthFlow::Oauth => IssuedToken {
                        token: SecureString::new(format!("mock-access-{}", credentials.username)),
                        token_type: "Bearer".to_string(),
                        expires_in: Some(3600),
                    },
                };
                self.tokens.write().await.insert(
                    issued.token.expose_secret().to_string(),
                    credentials.username.clone(),
                );
                Ok(issued)
            }
            _ => Err(ConnectorError::AuthenticationFailed(
                "Invalid username or password".to_string(),
            )),
        }
    }

    async fn verify_token(&self, token: &str) -> ConnectorResult<VerifiedToken> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ConnectorError::ConnectionFailed(
                "mock provider unavailable".to_string(),
            ));
        }

        match self.tokens.read().await.get(token) {
            Some(subject) => Ok(VerifiedToken::new(subject.clone())),
            None => Err(ConnectorError::AuthenticationFailed(
                "Token is not active".to_string(),
            )),
        }
    }
}
