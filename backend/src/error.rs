//! Error types for the session service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::{AuthError, TokenError};
use crate::store::StoreError;

/// Outcome of a rejected session operation.
///
/// `Internal` keeps its detail for the log only; clients see a generic message.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("A session is already active for this user")]
    Conflict,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        SessionError::Internal(format!("credential store: {}", e))
    }
}

impl From<TokenError> for SessionError {
    fn from(e: TokenError) -> Self {
        SessionError::Internal(format!("token codec: {}", e))
    }
}

impl From<AuthError> for SessionError {
    fn from(e: AuthError) -> Self {
        SessionError::BadRequest(e.to_string())
    }
}

impl SessionError {
    pub fn status(&self) -> StatusCode {
        match self {
            SessionError::BadRequest(_) => StatusCode::BAD_REQUEST,
            SessionError::Unauthorized => StatusCode::UNAUTHORIZED,
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::Conflict => StatusCode::CONFLICT,
            SessionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            SessionError::BadRequest(_) => "bad_request",
            SessionError::Unauthorized => "unauthorized",
            SessionError::NotFound(_) => "not_found",
            SessionError::Conflict => "conflict",
            SessionError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message = match &self {
            SessionError::Internal(detail) => {
                tracing::error!("Request failed: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "type": self.error_type(),
                "message": message
            }
        }));

        (self.status(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
