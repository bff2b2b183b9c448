//! Upstream conversation WebSocket endpoint.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::upstream::credential::{Credential, API_KEY_HEADER};
use crate::upstream::tls::install_crypto_provider;
use crate::upstream::types::UpstreamError;

/// Live socket to the upstream conversation endpoint.
pub type UpstreamSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where and how relay sessions reach the upstream.
#[derive(Clone)]
pub struct ConversationEndpoint {
    url: Url,
    credential: Option<Credential>,
    connect_timeout: Option<Duration>,
}

impl ConversationEndpoint {
    pub fn new(
        config: &UpstreamConfig,
        timeouts: &TimeoutConfig,
        credential: Option<Credential>,
    ) -> Result<Self, UpstreamError> {
        let mut url = Url::parse(&config.conversation_ws_url).map_err(|e| {
            UpstreamError::InvalidUrl(format!("{}: {}", config.conversation_ws_url, e))
        })?;
        url.query_pairs_mut()
            .append_pair("agent_id", &config.agent_id);
        install_crypto_provider();

        Ok(Self {
            url,
            credential,
            connect_timeout: timeouts.connect_secs.map(Duration::from_secs),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Open one upstream conversation socket.
    pub async fn connect(&self) -> Result<UpstreamSocket, UpstreamError> {
        let mut request = self.url.as_str().into_client_request()?;
        if let Some(credential) = &self.credential {
            let value = credential
                .header_value()
                .map_err(|_| UpstreamError::InvalidCredential)?;
            request.headers_mut().insert(API_KEY_HEADER, value);
        }

        let (socket, _response) = match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect_async(request))
                .await
                .map_err(|_| UpstreamError::Timeout)??,
            None => connect_async(request).await?,
        };

        Ok(socket)
    }
}

impl std::fmt::Debug for ConversationEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationEndpoint")
            .field("url", &self.url.as_str())
            .field("credential", &self.credential)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
