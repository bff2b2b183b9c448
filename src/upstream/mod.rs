//! Upstream conversational API integration.
//!
//! # Data Flow
//! ```text
//! Environment variable (API key)
//!     → credential.rs (read once, redacted)
//!     → client.rs (REST calls, xi-api-key header, status classification)
//!     → conversation.rs (WebSocket handshake for relay sessions)
//!     → tls.rs (rustls crypto provider for wss:// upstreams)
//! ```
//!
//! # Security Constraints
//! - The key is only read from the environment
//! - Never log the key or echo it to clients

pub mod client;
pub mod conversation;
pub mod credential;
pub mod tls;
pub mod types;

pub use client::UpstreamClient;
pub use conversation::{ConversationEndpoint, UpstreamSocket};
pub use credential::{Credential, API_KEY_HEADER};
pub use tls::install_crypto_provider;
pub use types::{Endpoint, UpstreamError, UpstreamReply};
