//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (preflight answers, Access-Control-* response headers)
//!     → Pass to handlers
//! Outgoing upstream call:
//!     → upstream::credential (server-held key attached server-side only)
//! ```
//!
//! # Design Decisions
//! - No end-user authentication; the relay trusts every caller
//! - The API key is the only secret and never leaves the server

pub mod cors;

pub use cors::cors_layer;
