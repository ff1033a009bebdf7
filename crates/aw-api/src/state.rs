//! Application state shared across handlers.

use aw_connectors::IdentityGateway;
use aw_core::AssetStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Read-only asset snapshot.
    pub asset_store: Arc<AssetStore>,
    /// Gateway used by `/auth` and to verify bearer tokens on `/assets`.
    pub identity: Arc<dyn IdentityGateway>,
}

impl AppState {
    /// Creates application state from a populated snapshot and a gateway.
    pub fn new(asset_store: AssetStore, identity: Arc<dyn IdentityGateway>) -> Self {
        Self {
            asset_store: Arc::new(asset_store),
            identity,
        }
    }
}
