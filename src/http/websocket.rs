//! WebSocket relay.
//!
//! # Responsibilities
//! - Complete the upgrade handshake with the client
//! - Open the matching upstream conversation socket
//! - Bidirectional frame forwarding until either side ends
//!
//! # Data Flow
//! ```text
//! Client ←──── WebSocket frames ────→ Relay ←──── WebSocket frames ────→ Upstream
//! ```
//!
//! # Design Decisions
//! - Two forwarding loops joined with `select!`: the first to finish wins
//!   and the other is dropped, then both sinks are closed
//! - Frame-level forwarding: text and binary pass unmodified, in order
//! - Close frames propagated in both directions
//! - Ping/pong answered per leg, never forwarded
//! - No timeouts: a stalled peer keeps its session open

use std::sync::Arc;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use thiserror::Error;
use tokio_tungstenite::tungstenite::{
    self,
    protocol::{frame::coding::CloseCode, CloseFrame as UpstreamCloseFrame},
    Message as UpstreamMessage,
};
use uuid::Uuid;

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::{ConversationEndpoint, UpstreamSocket};

const CLIENT_TO_UPSTREAM: &str = "client_to_upstream";
const UPSTREAM_TO_CLIENT: &str = "upstream_to_client";

/// Failure on one leg of a relay session.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("client socket error: {0}")]
    Client(#[source] axum::Error),

    #[error("upstream socket error: {0}")]
    Upstream(#[source] tungstenite::Error),
}

/// Why a relay session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// Client sent a close frame or its stream ended.
    ClientClosed,
    /// Client socket failed; treated as a disconnect.
    ClientDropped(RelayError),
    /// Upstream sent a close frame or its stream ended.
    UpstreamClosed,
    /// Upstream socket failed.
    Failed(RelayError),
}

impl SessionEnd {
    fn from_error(err: RelayError) -> Self {
        match err {
            RelayError::Client(_) => SessionEnd::ClientDropped(err),
            RelayError::Upstream(_) => SessionEnd::Failed(err),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionEnd::ClientClosed => "client_closed",
            SessionEnd::ClientDropped(_) => "client_dropped",
            SessionEnd::UpstreamClosed => "upstream_closed",
            SessionEnd::Failed(_) => "error",
        }
    }
}

/// `GET /ws`
pub async fn relay_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let endpoint = state.conversation.clone();
    ws.on_upgrade(move |socket| run_session(socket, endpoint))
}

/// Drive one relay session from upgrade to teardown.
pub async fn run_session(client: WebSocket, endpoint: Arc<ConversationEndpoint>) {
    let session_id = Uuid::new_v4();

    let upstream = match endpoint.connect().await {
        Ok(socket) => socket,
        Err(e) => {
            tracing::error!(
                session_id = %session_id,
                error = %e,
                "Failed to open upstream conversation"
            );
            reject(client).await;
            return;
        }
    };

    tracing::info!(session_id = %session_id, "Relay session opened");
    metrics::session_opened();

    let end = relay(client, upstream).await;

    match &end {
        SessionEnd::ClientClosed => {
            tracing::info!(session_id = %session_id, "Client disconnected")
        }
        SessionEnd::ClientDropped(e) => {
            tracing::info!(session_id = %session_id, error = %e, "Client disconnected")
        }
        SessionEnd::UpstreamClosed => {
            tracing::info!(session_id = %session_id, "Upstream closed conversation")
        }
        SessionEnd::Failed(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "Relay error")
        }
    }
    metrics::session_closed(end.label());
}

/// Copy frames both ways until one side ends, then close both.
pub async fn relay(client: WebSocket, upstream: UpstreamSocket) -> SessionEnd {
    let (mut client_tx, mut client_rx) = client.split();
    let (mut upstream_tx, mut upstream_rx) = upstream.split();

    let end = tokio::select! {
        res = client_to_upstream(&mut client_rx, &mut upstream_tx) => match res {
            Ok(()) => SessionEnd::ClientClosed,
            Err(e) => SessionEnd::from_error(e),
        },
        res = upstream_to_client(&mut upstream_rx, &mut client_tx) => match res {
            Ok(()) => SessionEnd::UpstreamClosed,
            Err(e) => SessionEnd::from_error(e),
        },
    };

    let _ = upstream_tx.close().await;
    let _ = client_tx.close().await;

    end
}

async fn client_to_upstream(
    client_rx: &mut SplitStream<WebSocket>,
    upstream_tx: &mut SplitSink<UpstreamSocket, UpstreamMessage>,
) -> Result<(), RelayError> {
    while let Some(msg) = client_rx.next().await {
        let forwarded = match msg.map_err(RelayError::Client)? {
            Message::Text(text) => UpstreamMessage::Text(text.as_str().into()),
            Message::Binary(data) => UpstreamMessage::Binary(data),
            Message::Close(frame) => {
                let _ = upstream_tx
                    .send(UpstreamMessage::Close(frame.map(close_to_upstream)))
                    .await;
                return Ok(());
            }
            Message::Ping(_) | Message::Pong(_) => continue,
        };
        upstream_tx
            .send(forwarded)
            .await
            .map_err(RelayError::Upstream)?;
        metrics::message_relayed(CLIENT_TO_UPSTREAM);
    }
    Ok(())
}

async fn upstream_to_client(
    upstream_rx: &mut SplitStream<UpstreamSocket>,
    client_tx: &mut SplitSink<WebSocket, Message>,
) -> Result<(), RelayError> {
    while let Some(msg) = upstream_rx.next().await {
        let forwarded = match msg.map_err(RelayError::Upstream)? {
            UpstreamMessage::Text(text) => Message::Text(text.as_str().into()),
            UpstreamMessage::Binary(data) => Message::Binary(data),
            UpstreamMessage::Close(frame) => {
                let _ = client_tx
                    .send(Message::Close(frame.map(close_to_client)))
                    .await;
                return Ok(());
            }
            UpstreamMessage::Ping(_) | UpstreamMessage::Pong(_) | UpstreamMessage::Frame(_) => {
                continue
            }
        };
        client_tx.send(forwarded).await.map_err(RelayError::Client)?;
        metrics::message_relayed(UPSTREAM_TO_CLIENT);
    }
    Ok(())
}

/// Close the client socket after a failed upstream handshake.
async fn reject(mut client: WebSocket) {
    let frame = CloseFrame {
        code: close_code::ERROR,
        reason: "upstream unavailable".into(),
    };
    let _ = client.send(Message::Close(Some(frame))).await;
}

fn close_to_upstream(frame: CloseFrame) -> UpstreamCloseFrame {
    UpstreamCloseFrame {
        code: CloseCode::from(frame.code),
        reason: frame.reason.as_str().into(),
    }
}

fn close_to_client(frame: UpstreamCloseFrame) -> CloseFrame {
    CloseFrame {
        code: frame.code.into(),
        reason: frame.reason.as_str().into(),
    }
}
