//! Device descriptor endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use pironman_domain::device::DeviceInfo;

use crate::state::DashboardState;

/// Body of `GET /api/device`.
#[derive(Debug, Serialize)]
pub struct DeviceResponse {
    #[serde(flatten)]
    pub device: DeviceInfo,
    pub database: String,
    pub spc_enabled: bool,
}

/// `GET /api/device`: what the case is and which peripherals it carries.
pub async fn get(State(state): State<DashboardState>) -> Json<DeviceResponse> {
    Json(DeviceResponse {
        device: state.device().clone(),
        database: state.database().to_string(),
        spc_enabled: state.spc_enabled(),
    })
}
