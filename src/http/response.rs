//! Passthrough responses.
//!
//! Upstream status and body are copied verbatim; only `Content-Type` is
//! carried over from the upstream headers. Hop-by-hop and upstream
//! bookkeeping headers are not forwarded.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Build a response from an upstream status, content type and raw body.
pub fn passthrough(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Response {
    let mut response = (status, Body::from(body)).into_response();
    if let Some(content_type) = content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn status_and_body_are_kept() {
        let response = passthrough(
            StatusCode::NOT_FOUND,
            Some(HeaderValue::from_static("text/plain")),
            Bytes::from_static(b"nope"),
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"nope");
    }

    #[test]
    fn missing_content_type_stays_missing() {
        let response = passthrough(StatusCode::OK, None, Bytes::from_static(b"{}"));
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
