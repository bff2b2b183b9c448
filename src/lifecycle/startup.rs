//! Startup orchestration.
//!
//! Fail fast: any startup error is fatal. The credential is read once here
//! and handed to the server as an explicit value. The listener binds last.

use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::upstream::Credential;

/// Run the relay until a termination signal arrives.
pub async fn start(config: RelayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let credential = Credential::from_env(&config.upstream.api_key_env);
    if credential.is_none() {
        tracing::warn!(
            env = %config.upstream.api_key_env,
            "API key not set; upstream calls will be sent unauthenticated"
        );
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_base_url = %config.upstream.api_base_url,
        conversation_ws_url = %config.upstream.conversation_ws_url,
        connect_timeout_secs = ?config.timeouts.connect_secs,
        request_timeout_secs = ?config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config, credential)?;

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::forward_signals(shutdown));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
