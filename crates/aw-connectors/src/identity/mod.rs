//! Identity provider gateways.

pub mod mock;
pub mod okta;

pub use mock::MockIdentityGateway;
pub use okta::{OktaAuthnGateway, OktaConfig, OktaTokenGateway};

use crate::traits::{AuthFlow, ConnectorResult, IdentityGateway};
use std::sync::Arc;

/// Builds the Okta gateway for the configured flow.
pub fn create_okta_gateway(
    config: OktaConfig,
    flow: AuthFlow,
) -> ConnectorResult<Arc<dyn IdentityGateway>> {
    let gateway: Arc<dyn IdentityGateway> = match flow {
        AuthFlow::Authn => Arc::new(OktaAuthnGateway::new(config)?),
        AuthFlow::Oauth => Arc::new(OktaTokenGateway::new(config)?),
    };
    Ok(gateway)
}
