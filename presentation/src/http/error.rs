//! HTTP error responses.
//!
//! Every error renders as `{"error": "<message>"}`. Failures inside a turn
//! are logged with their cause and reported to the caller only as
//! `Server error`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_application::RunTurnError;
use relay_domain::AuthorizationHeaderError;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Request Body is empty")]
    EmptyBody,

    #[error("Server error")]
    Internal(#[source] RunTurnError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::EmptyBody | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            error!(error = %source, "Turn failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<AuthorizationHeaderError> for ApiError {
    fn from(e: AuthorizationHeaderError) -> Self {
        match e {
            AuthorizationHeaderError::Missing => ApiError::Unauthorized(e.to_string()),
            AuthorizationHeaderError::Malformed => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<RunTurnError> for ApiError {
    fn from(e: RunTurnError) -> Self {
        ApiError::Internal(e)
    }
}
