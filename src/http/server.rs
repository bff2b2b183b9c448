//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the relay and forwarding handlers
//! - Wire up middleware (CORS, tracing, request ID)
//! - Serve on a bound listener until shutdown

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::http::forward::{
    agent_detail, conversation_detail, create_agent, list_agents, list_conversations,
};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::websocket::relay_handler;
use crate::lifecycle::shutdown;
use crate::security::cors_layer;
use crate::upstream::{ConversationEndpoint, Credential, UpstreamClient, UpstreamError};

/// Application state injected into handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub conversation: Arc<ConversationEndpoint>,
}

impl AppState {
    pub fn new(config: &RelayConfig, credential: Option<Credential>) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::new(&config.upstream, &config.timeouts, credential.clone())?;
        let conversation =
            ConversationEndpoint::new(&config.upstream, &config.timeouts, credential)?;
        Ok(Self {
            upstream: Arc::new(upstream),
            conversation: Arc::new(conversation),
        })
    }
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server. `credential` is attached to every upstream call.
    pub fn new(config: RelayConfig, credential: Option<Credential>) -> Result<Self, UpstreamError> {
        let state = AppState::new(&config, credential)?;
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/ws", get(relay_handler))
            .route("/create_agent", post(create_agent))
            .route("/agents-list", get(list_agents))
            .route("/detail-agent", get(agent_detail))
            .route("/conversation-list", get(list_conversations))
            .route("/detail-conversation", get(conversation_detail))
            .with_state(state)
            .layer(cors_layer())
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
