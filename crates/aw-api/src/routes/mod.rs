//! API routes.

pub mod assets;
pub mod auth;
pub mod health;

use crate::state::AppState;
use axum::Router;

/// Creates the main API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/assets", assets::routes())
        .merge(auth::routes())
        .merge(health::routes())
        .with_state(state)
}
