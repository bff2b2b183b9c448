//! Upstream operation and error definitions.

use axum::body::Bytes;
use reqwest::header::HeaderValue;
use reqwest::{Method, StatusCode};
use thiserror::Error;
use url::Url;

const CREATE_AGENT_PATH: &[&str] = &["v1", "convai", "agents", "create"];
const AGENTS_PATH: &[&str] = &["v1", "convai", "agents"];
const CONVERSATIONS_PATH: &[&str] = &["v1", "convai", "conversations"];

/// The REST operations the relay forwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /v1/convai/agents/create`
    CreateAgent,
    /// `GET /v1/convai/agents`
    ListAgents,
    /// `GET /v1/convai/agents/{agent_id}`
    AgentDetail(String),
    /// `GET /v1/convai/conversations`
    ListConversations,
    /// `GET /v1/convai/conversations/{conversation_id}`
    ConversationDetail(String),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::CreateAgent => Method::POST,
            _ => Method::GET,
        }
    }

    /// Stable label used in logs and metrics.
    pub fn operation(&self) -> &'static str {
        match self {
            Endpoint::CreateAgent => "create_agent",
            Endpoint::ListAgents => "list_agents",
            Endpoint::AgentDetail(_) => "agent_detail",
            Endpoint::ListConversations => "list_conversations",
            Endpoint::ConversationDetail(_) => "conversation_detail",
        }
    }

    /// Resolve the upstream URL against `base`.
    ///
    /// Identifiers are appended as a single percent-encoded path segment.
    pub fn url(&self, base: &Url) -> Result<Url, UpstreamError> {
        let (fixed, id) = match self {
            Endpoint::CreateAgent => (CREATE_AGENT_PATH, None),
            Endpoint::ListAgents => (AGENTS_PATH, None),
            Endpoint::AgentDetail(id) => (AGENTS_PATH, Some(id.as_str())),
            Endpoint::ListConversations => (CONVERSATIONS_PATH, None),
            Endpoint::ConversationDetail(id) => (CONVERSATIONS_PATH, Some(id.as_str())),
        };

        let mut url = base.clone();
        url.set_query(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidUrl(base.to_string()))?;
            segments.pop_if_empty().extend(fixed);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

/// A successful upstream answer, passed through as-is.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Errors that can occur while talking to the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status.
    #[error("upstream rejected request with status {status}")]
    Rejected {
        status: StatusCode,
        content_type: Option<HeaderValue>,
        body: Bytes,
    },

    /// Configured connect or request timeout elapsed.
    #[error("upstream timed out")]
    Timeout,

    /// Connection or protocol failure on the REST side.
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// WebSocket handshake with the upstream failed.
    #[error("upstream handshake failed: {0}")]
    Handshake(#[source] Box<tokio_tungstenite::tungstenite::Error>),

    /// Success status but the body is not JSON.
    #[error("upstream returned invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// The configured key cannot be encoded as a header value.
    #[error("credential is not a valid header value")]
    InvalidCredential,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(err)
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for UpstreamError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        UpstreamError::Handshake(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.example.com").unwrap()
    }

    #[test]
    fn fixed_paths() {
        assert_eq!(
            Endpoint::CreateAgent.url(&base()).unwrap().as_str(),
            "https://api.example.com/v1/convai/agents/create"
        );
        assert_eq!(
            Endpoint::ListConversations.url(&base()).unwrap().as_str(),
            "https://api.example.com/v1/convai/conversations"
        );
    }

    #[test]
    fn identifier_is_a_single_encoded_segment() {
        let url = Endpoint::AgentDetail("a/b c?x".into()).url(&base()).unwrap();
        assert_eq!(url.path(), "/v1/convai/agents/a%2Fb%20c%3Fx");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let base = Url::parse("http://127.0.0.1:9000/mock/").unwrap();
        let url = Endpoint::ConversationDetail("conv_1".into()).url(&base).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/mock/v1/convai/conversations/conv_1");
    }

    #[test]
    fn only_create_is_post() {
        assert_eq!(Endpoint::CreateAgent.method(), Method::POST);
        assert_eq!(Endpoint::ListAgents.method(), Method::GET);
        assert_eq!(Endpoint::AgentDetail("x".into()).method(), Method::GET);
    }
}
