//! Local API errors and their HTTP mapping.
//!
//! Upstream rejections are the exception to the structured body: they are
//! answered with the upstream's own status and raw body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::http::response::passthrough;
use crate::upstream::UpstreamError;

/// Errors returned by the REST handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required query parameter was absent or blank.
    #[error("missing required query parameter '{0}'")]
    MissingParameter(&'static str),

    /// A query parameter cannot be used as a path identifier.
    #[error("invalid value for query parameter '{0}'")]
    InvalidParameter(&'static str),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Structured error body for locally produced errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::InvalidParameter(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Upstream(UpstreamError::Rejected { status, .. }) => *status,
            Self::Upstream(UpstreamError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(
                UpstreamError::InvalidUrl(_) | UpstreamError::InvalidCredential,
            ) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
            Self::Upstream(UpstreamError::Rejected { .. }) => "UPSTREAM_REJECTED",
            Self::Upstream(UpstreamError::Timeout) => "UPSTREAM_TIMEOUT",
            Self::Upstream(UpstreamError::InvalidJson(_)) => "UPSTREAM_INVALID_JSON",
            Self::Upstream(UpstreamError::InvalidUrl(_) | UpstreamError::InvalidCredential) => {
                "INTERNAL_ERROR"
            }
            Self::Upstream(_) => "UPSTREAM_UNAVAILABLE",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        match self {
            ApiError::Upstream(UpstreamError::Rejected {
                status,
                content_type,
                body,
            }) => {
                tracing::debug!(status = %status, "Passing upstream rejection through");
                passthrough(status, content_type, body)
            }
            other => {
                let message = other.to_string();
                if status.is_server_error() {
                    tracing::error!(error_code = code, message = %message, "API error");
                } else {
                    tracing::debug!(error_code = code, message = %message, "Client error");
                }
                (
                    status,
                    Json(ErrorResponse {
                        error: message,
                        code,
                    }),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::HeaderValue;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_parameter_is_422_with_code() {
        let response = ApiError::MissingParameter("agent_id").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_of(response).await;
        assert_eq!(body["code"], "MISSING_PARAMETER");
        assert_eq!(body["error"], "missing required query parameter 'agent_id'");
    }

    #[tokio::test]
    async fn rejection_is_raw_passthrough() {
        let response = ApiError::from(UpstreamError::Rejected {
            status: StatusCode::UNAUTHORIZED,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: Bytes::from_static(br#"{"detail":{"status":"invalid_api_key"}}"#),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"detail":{"status":"invalid_api_key"}}"#);
    }

    #[test]
    fn timeout_maps_to_gateway_timeout() {
        let response = ApiError::from(UpstreamError::Timeout).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn invalid_json_maps_to_bad_gateway() {
        let err = serde_json::from_slice::<serde_json::Value>(b"<html>").unwrap_err();
        let response = ApiError::from(UpstreamError::InvalidJson(err)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
