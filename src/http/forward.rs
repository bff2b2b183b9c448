//! REST forwarding handlers.
//!
//! Each handler validates what the relay owns locally (the identifier query
//! parameters), then hands an [`Endpoint`] to the upstream client. Request
//! bodies are opaque JSON objects. Upstream answers come back verbatim:
//! success bodies with their status, rejections with the upstream status
//! and raw body.

use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::http::error::ApiError;
use crate::http::request::request_id;
use crate::http::response::passthrough;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::{Endpoint, UpstreamError};

#[derive(Debug, Deserialize)]
pub struct AgentQuery {
    pub agent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub conversation_id: Option<String>,
}

/// `POST /create_agent`
pub async fn create_agent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    forward(&state, &headers, Endpoint::CreateAgent, Some(&body)).await
}

/// `GET /agents-list`
pub async fn list_agents(State(state): State<AppState>, headers: HeaderMap) -> Response {
    forward(&state, &headers, Endpoint::ListAgents, None).await
}

/// `GET /detail-agent?agent_id=...`
pub async fn agent_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AgentQuery>,
) -> Result<Response, ApiError> {
    let agent_id = required_identifier("agent_id", query.agent_id)?;
    Ok(forward(&state, &headers, Endpoint::AgentDetail(agent_id), None).await)
}

/// `GET /conversation-list`
pub async fn list_conversations(State(state): State<AppState>, headers: HeaderMap) -> Response {
    forward(&state, &headers, Endpoint::ListConversations, None).await
}

/// `GET /detail-conversation?conversation_id=...`
pub async fn conversation_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ConversationQuery>,
) -> Result<Response, ApiError> {
    let conversation_id = required_identifier("conversation_id", query.conversation_id)?;
    Ok(forward(&state, &headers, Endpoint::ConversationDetail(conversation_id), None).await)
}

/// Reject absent or blank identifiers, and dot segments that would not
/// survive as a path segment.
fn required_identifier(name: &'static str, value: Option<String>) -> Result<String, ApiError> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ApiError::MissingParameter(name))?;
    if value == "." || value == ".." {
        return Err(ApiError::InvalidParameter(name));
    }
    Ok(value)
}

async fn forward(
    state: &AppState,
    headers: &HeaderMap,
    endpoint: Endpoint,
    body: Option<&Map<String, Value>>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(headers);
    let operation = endpoint.operation();

    let response = match state.upstream.forward(&endpoint, body).await {
        Ok(reply) => {
            let content_type = if reply.body.is_empty() {
                reply.content_type
            } else {
                reply
                    .content_type
                    .or(Some(HeaderValue::from_static("application/json")))
            };
            passthrough(reply.status, content_type, reply.body)
        }
        Err(e) => {
            match &e {
                UpstreamError::Rejected { status, .. } => tracing::warn!(
                    request_id = %request_id,
                    operation,
                    status = %status,
                    "Upstream rejected request"
                ),
                other => tracing::error!(
                    request_id = %request_id,
                    operation,
                    error = %other,
                    "Upstream call failed"
                ),
            }
            ApiError::from(e).into_response()
        }
    };

    let status = response.status().as_u16();
    metrics::record_forward(operation, status, start);
    tracing::info!(
        request_id = %request_id,
        operation,
        status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Forwarded request"
    );

    response
}
