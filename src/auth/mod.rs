//! Authentication module for the dashboard client.
//!
//! The dashboard API authenticates every request with a static bearer
//! token.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::config::token_hint;
use crate::errors::DashboardError;

/// Authentication provider trait.
///
/// Implementations of this trait provide authentication credentials
/// for API requests.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str;

    /// Validate the credentials.
    fn validate(&self) -> Result<(), DashboardError>;
}

/// Bearer token authentication provider.
pub struct BearerTokenAuth {
    token: SecretString,
}

impl BearerTokenAuth {
    /// Creates a new bearer token provider.
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Creates from a string token.
    pub fn from_string(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
        }
    }

    /// Gets a hint of the token for debugging (last 4 characters).
    pub fn token_hint(&self) -> String {
        token_hint(self.token.expose_secret())
    }
}

impl AuthProvider for BearerTokenAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.token.expose_secret()),
        );
    }

    fn scheme(&self) -> &str {
        "Bearer"
    }

    fn validate(&self) -> Result<(), DashboardError> {
        let token = self.token.expose_secret();

        if token.is_empty() {
            return Err(DashboardError::configuration("Bearer token cannot be empty"));
        }

        // JWTs carry three dot-separated segments
        if token.split('.').count() != 3 {
            tracing::warn!(
                token_hint = %self.token_hint(),
                "Bearer token does not look like a JWT"
            );
        }

        Ok(())
    }
}

impl std::fmt::Debug for BearerTokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokenAuth")
            .field("token", &"[REDACTED]")
            .field("token_hint", &self.token_hint())
            .finish()
    }
}
