//! Server-held API key.
//!
//! # Security Constraints
//! - Read once at startup from the environment
//! - Never logged: `Debug` and `Display` are redacted
//! - Only ever written into outbound upstream request headers

use std::fmt;

use reqwest::header::{HeaderValue, InvalidHeaderValue};

/// Header the upstream API reads the key from.
pub const API_KEY_HEADER: &str = "xi-api-key";

/// Opaque upstream API key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read the key from `var`. Unset or blank variables yield `None`.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(Self)
    }

    /// Header value for outbound requests, marked sensitive so HTTP
    /// libraries keep it out of their own debug output.
    pub fn header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&self.0)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
