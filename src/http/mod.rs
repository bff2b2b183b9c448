//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → websocket.rs (GET /ws: upgrade, relay session)
//!     → forward.rs (REST: validate, call upstream)
//!     → response.rs / error.rs (passthrough or local error)
//!     → Send to client
//! ```

pub mod error;
pub mod forward;
pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
