//! Configuration validation.
//!
//! Returns all validation errors, not just the first. Validation is a pure
//! function over a parsed [`RelayConfig`] and runs before the config is
//! accepted into the system.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: scheme '{scheme}' not allowed (expected {expected})")]
    UnsupportedScheme {
        field: &'static str,
        scheme: String,
        expected: &'static str,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(
        "listener.bind_address",
        &config.listener.bind_address,
        &mut errors,
    );

    check_url(
        "upstream.api_base_url",
        &config.upstream.api_base_url,
        &["http", "https"],
        "http or https",
        &mut errors,
    );
    check_url(
        "upstream.conversation_ws_url",
        &config.upstream.conversation_ws_url,
        &["ws", "wss"],
        "ws or wss",
        &mut errors,
    );

    if config.upstream.agent_id.trim().is_empty() {
        errors.push(ValidationError::Empty("upstream.agent_id"));
    }
    if config.upstream.api_key_env.trim().is_empty() {
        errors.push(ValidationError::Empty("upstream.api_key_env"));
    }

    if config.timeouts.connect_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(
    field: &'static str,
    value: &str,
    schemes: &[&str],
    expected: &'static str,
    errors: &mut Vec<ValidationError>,
) {
    match Url::parse(value) {
        Ok(url) if schemes.contains(&url.scheme()) => {}
        Ok(url) => errors.push(ValidationError::UnsupportedScheme {
            field,
            scheme: url.scheme().to_string(),
            expected,
        }),
        Err(_) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}
