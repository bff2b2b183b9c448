//! Conversational-AI relay library.
//!
//! Forwards WebSocket conversation frames and REST calls between clients and
//! the upstream conversational API, attaching the server-held API key.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upstream::Credential;
