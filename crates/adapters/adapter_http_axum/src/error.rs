//! HTTP error response mapping and server lifecycle errors.

use std::io;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pironman_domain::error::PironmanError;

/// Failures of the dashboard HTTP server itself.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to bind {addr}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("server stopped with an error")]
    Serve(#[source] io::Error),
    #[error("server task panicked or was cancelled")]
    Join(#[source] tokio::task::JoinError),
}

impl From<HttpError> for PironmanError {
    fn from(err: HttpError) -> Self {
        PironmanError::component("dashboard", err)
    }
}

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error returned from API handlers.
#[derive(Debug)]
pub enum ApiError {
    Domain(PironmanError),
    /// No config listener has been registered yet.
    Unavailable,
}

impl From<PironmanError> for ApiError {
    fn from(err: PironmanError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Domain(PironmanError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(err) => {
                tracing::error!(error = %err, "config change failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Self::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "config changes are not accepted yet".to_string(),
            ),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
