//! # aw-connectors
//!
//! Identity provider gateways used to exchange user credentials for tokens.

pub mod http;
pub mod identity;
pub mod secure_string;
pub mod testing;
pub mod traits;

pub use secure_string::SecureString;
pub use traits::{
    AuthFlow, ConnectorConfig, ConnectorError, ConnectorResult, Credentials, IdentityGateway,
    IssuedToken, VerifiedToken,
};

pub use identity::{
    create_okta_gateway, MockIdentityGateway, OktaAuthnGateway, OktaConfig, OktaTokenGateway,
};
