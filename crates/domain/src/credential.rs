//! Access credential for the hub websocket API.

use std::fmt;

use crate::error::ConfigError;

/// Long-lived access token presented during the authentication handshake.
///
/// The token is opaque to this crate and excluded from `Debug` output so
/// it cannot leak into logs.
#[derive(Clone)]
pub struct Credential {
    auth_token: String,
}

impl Credential {
    /// Wrap an access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when the token is blank,
    /// which stands in for an absent credential lookup.
    pub fn new(auth_token: impl Into<String>) -> Result<Self, ConfigError> {
        let auth_token = auth_token.into();
        if auth_token.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        Ok(Self { auth_token })
    }

    /// The raw token, for the authentication frame only.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.auth_token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
