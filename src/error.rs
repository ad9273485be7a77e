//! Service error types with HTTP status code mapping.
//!
//! [`ShareError`] is the central error type for the REST surface. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthError;
use crate::domain::{UserId, VideoId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "video not found: 42",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1099 | Validation      | 400 Bad Request           |
/// | 1100–1199 | Authentication  | 401 Unauthorized          |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request to the WebSocket endpoint was not a valid upgrade.
    #[error("not a websocket handshake: {0}")]
    Protocol(String),

    /// Missing or invalid bearer credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    /// The identity provider rejected the login or could not be reached.
    #[error("identity provider error: {0}")]
    IdentityProvider(String),

    /// Video with the given id was not found.
    #[error("video not found: {0}")]
    VideoNotFound(VideoId),

    /// User with the given id was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ShareError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Protocol(_) => 1002,
            Self::Unauthorized(_) => 1101,
            Self::IdentityProvider(_) => 1102,
            Self::VideoNotFound(_) => 2001,
            Self::UserNotFound(_) => 2002,
            Self::Persistence(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::Protocol(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) | Self::IdentityProvider(_) => StatusCode::UNAUTHORIZED,
            Self::VideoNotFound(_) | Self::UserNotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ShareError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<JsonRejection> for ShareError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ShareError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ShareError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_ranges() {
        assert_eq!(
            ShareError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShareError::Protocol("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShareError::Unauthorized(AuthError::InvalidScheme).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ShareError::VideoNotFound(VideoId::new(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ShareError::Persistence("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_carries_code_and_status() {
        let response = ShareError::UserNotFound(UserId::new(3)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn message_names_missing_video() {
        let err = ShareError::VideoNotFound(VideoId::new(42));
        assert_eq!(err.error_code(), 2001);
        assert_eq!(err.to_string(), "video not found: 42");
    }
}
