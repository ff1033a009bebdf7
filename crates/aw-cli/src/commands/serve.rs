//! Serve command - populates the asset store and starts the API server.

use anyhow::{Context, Result};
use aw_api::{ApiServer, ApiServerConfig, AppState};
use aw_connectors::{create_okta_gateway, IdentityGateway};
use aw_core::{AddressCatalog, AssetStore, AssetStoreBuilder};
use colored::Colorize;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{AppConfig, AssetsConfig, IdentityConfig};

/// Loads the address catalog and generates the asset snapshot.
///
/// Any catalog or population failure aborts before a single asset is served.
pub fn build_asset_store(assets: &AssetsConfig) -> Result<AssetStore> {
    let catalog = AddressCatalog::load(&assets.addresses_path).with_context(|| {
        format!(
            "Failed to load address catalog from {}",
            assets.addresses_path.display()
        )
    })?;
    catalog
        .ensure_complete()
        .context("Address catalog is incomplete")?;

    let mut builder = AssetStoreBuilder::new();
    let populated = if assets.concurrent {
        let seed = assets.seed.unwrap_or_else(rand::random);
        info!(seed, "Using concurrent population");
        builder.populate_concurrent(assets.count_per_unit, &catalog, seed)
    } else {
        let mut rng = match assets.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        builder.populate(assets.count_per_unit, &catalog, &mut rng)
    };
    populated.context("Failed to populate asset store")?;

    Ok(builder.build())
}

/// Creates the Okta gateway for the configured flow.
pub fn build_identity_gateway(identity: &IdentityConfig) -> Result<Arc<dyn IdentityGateway>> {
    create_okta_gateway(identity.to_okta_config(), identity.flow)
        .context("Failed to create identity gateway")
}

/// Runs the API server.
pub async fn run_server(config: AppConfig) -> Result<()> {
    println!("{} Starting Asset Warden API Server...", "[server]".cyan());

    println!(
        "  {} Addresses: {}",
        "→".green(),
        config.assets.addresses_path.display()
    );
    let store = build_asset_store(&config.assets)?;
    println!(
        "  {} Generated {} assets ({} per business unit)",
        "✓".green(),
        store.len(),
        config.assets.count_per_unit
    );

    let identity = build_identity_gateway(&config.identity)?;
    println!(
        "  {} Identity: {} ({} flow)",
        "→".green(),
        config.identity.base_url(),
        identity.flow()
    );

    let state = AppState::new(store, identity);

    let server_config = ApiServerConfig {
        bind_address: config.server.bind_address()?,
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        enable_docs: true,
    };

    println!();
    println!(
        "  {} Listening on http://{}",
        "→".green(),
        server_config.bind_address
    );
    println!();

    ApiServer::new(state, server_config)
        .run()
        .await
        .context("API server failed")
}
