//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod config;
pub mod device;
pub mod sse;
pub mod status;

use axum::Router;
use axum::routing::get;

use crate::state::DashboardState;

/// Build the `/api` sub-router.
pub fn routes() -> Router<DashboardState> {
    Router::new()
        .route("/device", get(device::get))
        .route("/status", get(status::get))
        .route("/status/stream", get(sse::stream))
        .route("/config", get(config::get).post(config::update))
}
