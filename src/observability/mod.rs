//! Observability module for the dashboard client.
//!
//! Provides the diagnostic logger, `tracing` subscriber setup and refresh
//! metrics.

mod logging;
mod metrics;

pub use logging::{init_subscriber, LogConfig, LogLevel, Logger, NoopLogger, TracingLogger};
pub use metrics::{DefaultMetricsCollector, MetricsCollector, RefreshMetrics};

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Observability configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Logging configuration.
    pub logging: LogConfig,
    /// Enable metrics collection.
    pub enable_metrics: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            logging: LogConfig::default(),
            enable_metrics: true,
        }
    }
}

/// Observability facade shared by the service and the store.
#[derive(Clone)]
pub struct Observability {
    logger: Arc<dyn Logger>,
    metrics: Arc<dyn MetricsCollector>,
    config: ObservabilityConfig,
}

impl Observability {
    /// Creates a new observability facade.
    pub fn new(config: ObservabilityConfig) -> Self {
        Self {
            logger: Arc::new(TracingLogger::new(config.logging.clone())),
            metrics: Arc::new(DefaultMetricsCollector::new()),
            config,
        }
    }

    /// Creates with custom logger and metrics collector.
    pub fn with_components(
        logger: Arc<dyn Logger>,
        metrics: Arc<dyn MetricsCollector>,
        config: ObservabilityConfig,
    ) -> Self {
        Self {
            logger,
            metrics,
            config,
        }
    }

    /// Returns the logger.
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Returns the metrics collector.
    pub fn metrics(&self) -> &Arc<dyn MetricsCollector> {
        &self.metrics
    }

    /// Records a refresh that published new state.
    pub fn record_success(&self, duration: Duration, links: usize) {
        if self.config.enable_metrics {
            self.metrics.record_refresh(true, duration);
            self.metrics.record_links(links);
        }
    }

    /// Records a refresh that failed.
    pub fn record_failure(&self, duration: Duration, error_kind: &str) {
        if self.config.enable_metrics {
            self.metrics.record_refresh(false, duration);
            self.metrics.record_error(error_kind);
        }
    }
}

impl Default for Observability {
    fn default() -> Self {
        Self::new(ObservabilityConfig::default())
    }
}

impl std::fmt::Debug for Observability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observability")
            .field("config", &self.config)
            .finish()
    }
}

/// Timer for measuring how long a refresh takes.
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Starts a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Returns the elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_metrics_record_nothing() {
        let observability = Observability::new(ObservabilityConfig {
            logging: LogConfig::default(),
            enable_metrics: false,
        });

        observability.record_success(Duration::from_millis(5), 3);
        observability.record_failure(Duration::from_millis(5), "decode");

        assert_eq!(observability.metrics().get_metrics().total_refreshes, 0);
    }

    #[test]
    fn test_enabled_metrics() {
        let observability = Observability::default();

        observability.record_success(Duration::from_millis(5), 3);
        observability.record_failure(Duration::from_millis(5), "decode");

        let metrics = observability.metrics().get_metrics();
        assert_eq!(metrics.total_refreshes, 2);
        assert_eq!(metrics.links_published, 3);
        assert_eq!(metrics.errors.get("decode"), Some(&1));
    }
}
