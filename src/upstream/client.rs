//! REST client for the upstream API.
//!
//! # Responsibilities
//! - Resolve an [`Endpoint`] to its upstream URL
//! - Attach the credential header and JSON content type
//! - Classify the answer: success (JSON or empty, passed through) or rejection
//!   (status, content type and raw body kept for the caller)
//!
//! No retries. Timeouts apply only when configured.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::de::IgnoredAny;
use serde_json::{Map, Value};
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::upstream::credential::{Credential, API_KEY_HEADER};
use crate::upstream::types::{Endpoint, UpstreamError, UpstreamReply};

/// Upstream REST client wrapper.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    api_base: Url,
    credential: Option<Credential>,
}

impl UpstreamClient {
    /// Create a new client for the configured API base.
    pub fn new(
        config: &UpstreamConfig,
        timeouts: &TimeoutConfig,
        credential: Option<Credential>,
    ) -> Result<Self, UpstreamError> {
        let api_base = Url::parse(&config.api_base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", config.api_base_url, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(UpstreamError::Transport)?;

        Ok(Self {
            http,
            api_base,
            credential,
        })
    }

    /// Forward one call to the upstream and classify the answer.
    ///
    /// `body` is only sent when present; it is serialized as-is.
    pub async fn forward(
        &self,
        endpoint: &Endpoint,
        body: Option<&Map<String, Value>>,
    ) -> Result<UpstreamReply, UpstreamError> {
        let url = endpoint.url(&self.api_base)?;

        tracing::debug!(
            operation = endpoint.operation(),
            method = %endpoint.method(),
            url = %url,
            "Forwarding to upstream"
        );

        let mut request = self
            .http
            .request(endpoint.method(), url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(credential) = &self.credential {
            let value = credential
                .header_value()
                .map_err(|_| UpstreamError::InvalidCredential)?;
            request = request.header(API_KEY_HEADER, value);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(UpstreamError::Rejected {
                status,
                content_type,
                body,
            });
        }

        // 204 and friends carry no body; anything else must be JSON.
        if !body.is_empty() {
            serde_json::from_slice::<IgnoredAny>(&body).map_err(UpstreamError::InvalidJson)?;
        }

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("api_base", &self.api_base.as_str())
            .field("credential", &self.credential)
            .finish()
    }
}
