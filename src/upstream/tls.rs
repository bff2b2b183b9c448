//! TLS setup for `wss://` upstreams.
//!
//! tokio-tungstenite builds its rustls client config from the process-wide
//! crypto provider, and panics when none can be chosen. The relay pins
//! `ring` and installs it before any upstream socket is opened.

use rustls::crypto::CryptoProvider;

/// Install `ring` as the process-wide rustls provider if none is set yet.
///
/// Safe to call more than once.
pub fn install_crypto_provider() {
    if CryptoProvider::get_default().is_some() {
        return;
    }
    // Err only means another caller installed one first.
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_ok()
    {
        tracing::debug!("Installed ring crypto provider");
    }
}
