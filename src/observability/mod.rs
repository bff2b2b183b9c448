//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder and relay produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached to every HTTP span
//! - Relay sessions carry their own UUID in log fields
//! - Credential values never reach a log field

pub mod logging;
pub mod metrics;
