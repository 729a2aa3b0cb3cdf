//! Configuration module for the dashboard client.
//!
//! The endpoint and bearer credential are injected here rather than compiled
//! in. A configuration is built either through [`DashboardConfigBuilder`] or
//! from environment variables.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::{Host, Url};

use crate::errors::{DashboardError, DashboardResult};

/// Default base URL for the dashboard API.
pub const DEFAULT_BASE_URL: &str = "https://api.inopenapp.com/api/v1";

/// Default path of the dashboard endpoint, relative to the base URL.
pub const DEFAULT_DASHBOARD_PATH: &str = "dashboardNew";

/// Configuration for the dashboard client.
#[derive(Clone)]
pub struct DashboardConfig {
    /// Bearer token for authentication (stored securely).
    pub(crate) api_token: SecretString,
    /// Base URL for API requests.
    pub base_url: String,
    /// Path of the dashboard endpoint.
    pub dashboard_path: String,
    /// Request timeout. `None` keeps the HTTP client default (no timeout).
    pub timeout: Option<Duration>,
    /// Log the raw response body at debug level before decoding.
    pub log_raw_response: bool,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl DashboardConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `INOPEN_API_TOKEN` (required): bearer token
    /// - `INOPEN_BASE_URL` (optional): custom base URL
    /// - `INOPEN_DASHBOARD_PATH` (optional): custom endpoint path
    /// - `INOPEN_TIMEOUT` (optional): request timeout in seconds
    /// - `INOPEN_LOG_RAW_RESPONSE` (optional): `true` or `1` to log raw bodies
    pub fn from_env() -> DashboardResult<Self> {
        let api_token = std::env::var("INOPEN_API_TOKEN").map_err(|_| {
            DashboardError::configuration("INOPEN_API_TOKEN environment variable not set")
        })?;

        let mut builder = DashboardConfigBuilder::new().api_token(api_token);

        if let Ok(base_url) = std::env::var("INOPEN_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(path) = std::env::var("INOPEN_DASHBOARD_PATH") {
            builder = builder.dashboard_path(path);
        }

        if let Ok(timeout_str) = std::env::var("INOPEN_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            } else {
                tracing::warn!(value = %timeout_str, "Ignoring unparseable INOPEN_TIMEOUT");
            }
        }

        if let Ok(flag) = std::env::var("INOPEN_LOG_RAW_RESPONSE") {
            builder = builder.log_raw_response(parse_flag(&flag));
        }

        builder.build()
    }

    /// Returns the bearer token (exposing the secret).
    pub(crate) fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }

    /// Returns a builder seeded with this configuration.
    pub fn to_builder(&self) -> DashboardConfigBuilder {
        DashboardConfigBuilder {
            api_token: Some(self.api_token().to_string()),
            base_url: Some(self.base_url.clone()),
            dashboard_path: Some(self.dashboard_path.clone()),
            timeout: self.timeout,
            log_raw_response: self.log_raw_response,
            custom_headers: self.custom_headers.clone(),
        }
    }

    /// Returns the token hint (last 4 characters) for debugging.
    pub fn api_token_hint(&self) -> String {
        token_hint(self.api_token.expose_secret())
    }

    /// Returns the full URL of the dashboard endpoint.
    pub fn dashboard_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url,
            self.dashboard_path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("api_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("dashboard_path", &self.dashboard_path)
            .field("timeout", &self.timeout)
            .field("log_raw_response", &self.log_raw_response)
            .finish()
    }
}

/// Builder for `DashboardConfig`.
#[derive(Default)]
pub struct DashboardConfigBuilder {
    api_token: Option<String>,
    base_url: Option<String>,
    dashboard_path: Option<String>,
    timeout: Option<Duration>,
    log_raw_response: bool,
    custom_headers: Vec<(String, String)>,
}

impl DashboardConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bearer token.
    pub fn api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    /// Sets the bearer token from an environment variable.
    pub fn api_token_from_env(mut self, var_name: &str) -> DashboardResult<Self> {
        let api_token = std::env::var(var_name).map_err(|_| {
            DashboardError::configuration(format!("Environment variable {} not set", var_name))
        })?;
        self.api_token = Some(api_token);
        Ok(self)
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the dashboard endpoint path.
    pub fn dashboard_path(mut self, path: impl Into<String>) -> Self {
        self.dashboard_path = Some(path.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Enables or disables raw response body logging.
    pub fn log_raw_response(mut self, enabled: bool) -> Self {
        self.log_raw_response = enabled;
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> DashboardResult<DashboardConfig> {
        let api_token = self
            .api_token
            .ok_or_else(|| DashboardError::configuration("API token is required"))?;

        if api_token.trim().is_empty() {
            return Err(DashboardError::configuration("API token cannot be empty"));
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = Url::parse(&base_url)?;
        match parsed.scheme() {
            "https" => {}
            "http" if is_loopback(&parsed) => {}
            _ => {
                return Err(DashboardError::configuration("Base URL must use HTTPS"))
            }
        }

        let dashboard_path = self
            .dashboard_path
            .unwrap_or_else(|| DEFAULT_DASHBOARD_PATH.to_string());
        if dashboard_path.trim_matches('/').is_empty() {
            return Err(DashboardError::configuration("Dashboard path cannot be empty"));
        }

        Ok(DashboardConfig {
            api_token: SecretString::new(api_token),
            base_url,
            dashboard_path,
            timeout: self.timeout,
            log_raw_response: self.log_raw_response,
            custom_headers: self.custom_headers,
        })
    }
}

/// Plain HTTP is only accepted for local test servers.
fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost",
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub(crate) fn token_hint(token: &str) -> String {
    if token.len() > 4 && token.is_char_boundary(token.len() - 4) {
        format!("...{}", &token[token.len() - 4..])
    } else {
        "****".to_string()
    }
}
