use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The upstream timing service could not produce session data
    /// (network failure, unknown event/year/session-type, malformed body).
    #[error("Session data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::DataUnavailable(msg) => {
                tracing::error!("Session data unavailable: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        (status, axum::Json(ErrorResponse { detail: message })).into_response()
    }
}

impl From<crate::services::provider::ProviderError> for AppError {
    fn from(err: crate::services::provider::ProviderError) -> Self {
        AppError::DataUnavailable(err.to_string())
    }
}
