//! Latest status snapshot endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pironman_domain::status::Status;

use crate::state::DashboardState;

/// Possible responses from the status endpoint.
pub enum GetResponse {
    Ok(Json<Status>),
    /// Automation has not reported anything yet.
    NoContent,
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/status`
pub async fn get(State(state): State<DashboardState>) -> GetResponse {
    match state.status() {
        Some(status) => GetResponse::Ok(Json(status)),
        None => GetResponse::NoContent,
    }
}
