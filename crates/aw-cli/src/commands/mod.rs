//! Subcommand implementations.

mod serve;

pub use serve::{build_asset_store, build_identity_gateway, run_server};
