//! Error types for the timeline API.
//!
//! [`ObserverError`] converts into a JSON `{error, status}` response via
//! [`IntoResponse`](axum::response::IntoResponse).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A request parameter was rejected.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// No feed is attached to this server.
    #[error("operator controls unavailable")]
    OperatorUnavailable,
}

impl ObserverError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest(_) | Self::InvalidUuid(_) => StatusCode::BAD_REQUEST,
            Self::OperatorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}
