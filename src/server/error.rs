//! API error types and response formatting.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::SiteMetaError;

/// API error type that converts to appropriate HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The extraction pipeline failed.
    #[error(transparent)]
    Pipeline(#[from] SiteMetaError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Pipeline(SiteMetaError::InvalidUrl { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error envelope.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    status: &'static str,
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::BadRequest(msg) => tracing::debug!(message = %msg, "bad request"),
            Self::Pipeline(err) if status.is_server_error() => {
                tracing::warn!(kind = err.kind(), error = %err, "metadata extraction failed")
            }
            Self::Pipeline(err) => tracing::debug!(kind = err.kind(), error = %err, "rejected url"),
        }

        let message = match self {
            Self::BadRequest(msg) => msg,
            Self::Pipeline(err) => err.to_string(),
        };

        let body = ErrorResponse {
            status: "error",
            code: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_is_400() {
        let err = ApiError::BadRequest("missing url".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_url_is_400() {
        let err = ApiError::from(SiteMetaError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn pipeline_failures_are_500() {
        let errors = [
            SiteMetaError::UnsupportedContent {
                content_type: "image/png".to_string(),
            },
            SiteMetaError::Parse("too large".to_string()),
            SiteMetaError::Encoding("unsupported charset 'X'".to_string()),
            SiteMetaError::Cancelled("deadline".to_string()),
        ];
        for err in errors {
            assert_eq!(
                ApiError::from(err).into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
