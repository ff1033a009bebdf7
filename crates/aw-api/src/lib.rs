//! # aw-api
//!
//! REST API server for Asset Warden.
//!
//! Serves the populated asset snapshot to bearer token holders and exchanges
//! HTTP Basic credentials for identity provider tokens.

pub mod auth;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use auth::AuthenticatedCaller;
pub use error::ApiError;
pub use server::{ApiServer, ApiServerConfig};
pub use state::AppState;
