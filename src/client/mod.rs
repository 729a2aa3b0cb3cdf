//! Dashboard API client.
//!
//! Wires configuration, transport, authentication and observability into a
//! [`DashboardService`].

use std::sync::Arc;

use crate::auth::{AuthProvider, BearerTokenAuth};
use crate::config::{DashboardConfig, DashboardConfigBuilder};
use crate::errors::{DashboardError, DashboardResult};
use crate::observability::{
    DefaultMetricsCollector, LogConfig, LogLevel, Logger, MetricsCollector, Observability,
    ObservabilityConfig, TracingLogger,
};
use crate::services::DashboardService;
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The dashboard client.
///
/// # Example
///
/// ```rust,no_run
/// use inopen_dashboard::DashboardClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = DashboardClient::builder()
///         .api_token("your.jwt.token")
///         .build()?;
///
///     let response = client.dashboard().fetch().await?;
///     println!("{} clicks today", response.today_clicks);
///     Ok(())
/// }
/// ```
pub struct DashboardClient {
    config: DashboardConfig,
    dashboard_service: DashboardService,
    observability: Observability,
}

impl DashboardClient {
    /// Creates a new client builder.
    pub fn builder() -> DashboardClientBuilder {
        DashboardClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `INOPEN_API_TOKEN` and optionally `INOPEN_BASE_URL`,
    /// `INOPEN_DASHBOARD_PATH`, `INOPEN_TIMEOUT` and
    /// `INOPEN_LOG_RAW_RESPONSE`.
    pub fn from_env() -> DashboardResult<Self> {
        let config = DashboardConfig::from_env()?;
        DashboardClientBuilder::from_config(config).build()
    }

    /// Returns the dashboard service.
    pub fn dashboard(&self) -> &DashboardService {
        &self.dashboard_service
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Returns the observability facade.
    pub fn observability(&self) -> &Observability {
        &self.observability
    }
}

impl std::fmt::Debug for DashboardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the dashboard client.
pub struct DashboardClientBuilder {
    config_builder: DashboardConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    logger: Option<Arc<dyn Logger>>,
    metrics: Option<Arc<dyn MetricsCollector>>,
    log_config: LogConfig,
}

impl DashboardClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: DashboardConfigBuilder::new(),
            transport: None,
            auth: None,
            logger: None,
            metrics: None,
            log_config: LogConfig::default(),
        }
    }

    /// Creates a builder from an existing configuration.
    ///
    /// Later setters override the values taken from `config`.
    pub fn from_config(config: DashboardConfig) -> Self {
        Self {
            config_builder: config.to_builder(),
            ..Self::new()
        }
    }

    /// Sets the bearer token.
    pub fn api_token(mut self, api_token: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_token(api_token);
        self
    }

    /// Sets the bearer token from an environment variable.
    pub fn api_token_from_env(mut self, var_name: &str) -> DashboardResult<Self> {
        self.config_builder = self.config_builder.api_token_from_env(var_name)?;
        Ok(self)
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the dashboard endpoint path.
    pub fn dashboard_path(mut self, path: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.dashboard_path(path);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Enables or disables raw response body logging.
    pub fn log_raw_response(mut self, enabled: bool) -> Self {
        self.config_builder = self.config_builder.log_raw_response(enabled);
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets a custom logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Sets a custom metrics collector.
    pub fn metrics(mut self, metrics: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Sets the log configuration.
    pub fn log_config(mut self, config: LogConfig) -> Self {
        self.log_config = config;
        self
    }

    /// Builds the client.
    pub fn build(self) -> DashboardResult<DashboardClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout)
                    .map_err(|e| DashboardError::configuration(e.to_string()))?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(BearerTokenAuth::new(config.api_token.clone())),
        };
        auth.validate()?;

        let mut log_config = self.log_config;
        if config.log_raw_response && log_config.level > LogLevel::Debug {
            log_config.level = LogLevel::Debug;
        }

        let logger: Arc<dyn Logger> = self
            .logger
            .unwrap_or_else(|| Arc::new(TracingLogger::new(log_config.clone())));
        let metrics: Arc<dyn MetricsCollector> = self
            .metrics
            .unwrap_or_else(|| Arc::new(DefaultMetricsCollector::new()));

        let dashboard_service = DashboardService::new(
            transport,
            auth,
            Arc::clone(&logger),
            config.dashboard_path.clone(),
        )
        .with_timeout(config.timeout)
        .with_headers(config.custom_headers.clone())
        .with_raw_response_logging(config.log_raw_response);

        let observability = Observability::with_components(
            logger,
            metrics,
            ObservabilityConfig {
                logging: log_config,
                enable_metrics: true,
            },
        );

        tracing::debug!(
            endpoint = %config.dashboard_url(),
            token_hint = %config.api_token_hint(),
            "Dashboard client built"
        );

        Ok(DashboardClient {
            config,
            dashboard_service,
            observability,
        })
    }
}

impl Default for DashboardClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
