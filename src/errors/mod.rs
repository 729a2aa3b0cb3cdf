//! Error types for the dashboard client.
//!
//! A fetch can fail in exactly two ways: the round-trip itself fails
//! (transport) or the body does not match the response model (decode).
//! Configuration errors only surface while building a client or starting
//! a store.

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Error type for dashboard client operations.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Configuration error (missing token, invalid base URL, no runtime).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Network or HTTP-level failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The payload does not match the expected shape.
    #[error("Decode error: {message}")]
    Decode {
        /// Error message from the decoder.
        message: String,
    },
}

impl DashboardError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        DashboardError::Configuration {
            message: message.into(),
        }
    }

    /// Short, stable name of the error kind, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::Configuration { .. } => "configuration",
            DashboardError::Transport(_) => "transport",
            DashboardError::Decode { .. } => "decode",
        }
    }

    /// Returns true if this is a decode failure.
    pub fn is_decode(&self) -> bool {
        matches!(self, DashboardError::Decode { .. })
    }

    /// Returns true if this is a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, DashboardError::Transport(_))
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Decode {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for DashboardError {
    fn from(err: url::ParseError) -> Self {
        DashboardError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Transport(TransportError::from(err))
    }
}
