//! Conversational-AI relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                    RELAY                     │
//!     Client            │  ┌──────────┐      ┌─────────────────────┐   │        Upstream
//!     ─── GET /ws ──────┼─▶│websocket │◀────▶│ conversation socket │◀──┼──────▶ /v1/convai/conversation
//!                       │  └──────────┘      └─────────────────────┘   │
//!                       │  ┌──────────┐      ┌─────────────────────┐   │
//!     ─── REST ─────────┼─▶│ forward  │─────▶│   upstream client   │───┼──────▶ /v1/convai/...
//!     ◀── passthrough ──┼──│          │◀─────│  (+ xi-api-key)     │◀──┼───────
//!                       │  └──────────┘      └─────────────────────┘   │
//!                       │                                              │
//!                       │  config · observability · security(CORS)     │
//!                       │  lifecycle(startup/signals/shutdown)         │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use convai_relay::config::load_or_default;
use convai_relay::lifecycle::startup;
use convai_relay::observability::logging;
use convai_relay::upstream::install_crypto_provider;

#[derive(Parser)]
#[command(name = "convai-relay")]
#[command(about = "Relay for the upstream conversational-AI API", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind.to_string();
    }

    logging::init_logging(&config.observability);

    tracing::info!("convai-relay v{} starting", env!("CARGO_PKG_VERSION"));

    // Must happen before the first wss:// handshake.
    install_crypto_provider();

    startup::start(config).await
}
