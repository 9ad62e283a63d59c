//! JSON REST handlers for the persisted configuration.

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use pironman_domain::config::ConfigDocument;
use pironman_domain::error::{PironmanError, ValidationError};

use crate::error::ApiError;
use crate::state::DashboardState;

/// `GET /api/config`: the document as last seen by the dashboard.
pub async fn get(State(state): State<DashboardState>) -> Json<ConfigDocument> {
    Json(state.config())
}

/// `POST /api/config`: apply a partial document.
///
/// The patch is handed to the registered config listener, which may touch
/// the disk and the hardware, so it runs on the blocking pool. On success the
/// merged document is returned and becomes the dashboard's copy.
pub async fn update(
    State(state): State<DashboardState>,
    Json(body): Json<Value>,
) -> Result<Json<ConfigDocument>, ApiError> {
    let Value::Object(patch) = body else {
        return Err(PironmanError::from(ValidationError::NotAnObject).into());
    };
    let listener = state.listener().ok_or(ApiError::Unavailable)?;

    let merged = tokio::task::spawn_blocking(move || listener.on_config_changed(&patch))
        .await
        .map_err(|err| PironmanError::component("dashboard", err))??;

    tracing::info!("config updated from dashboard");
    state.set_config(merged.clone());
    Ok(Json(merged))
}
