//! Cross-origin policy.
//!
//! Every origin, method and header is allowed, with credentials. Because
//! credentials are allowed the request `Origin` is mirrored back instead of
//! answering with a literal `*`, which browsers would refuse.

use tower_http::cors::CorsLayer;

/// Fully permissive CORS layer applied to every HTTP route.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::very_permissive()
}
