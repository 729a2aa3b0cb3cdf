//! Refresh metrics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Metrics collector interface.
pub trait MetricsCollector: Send + Sync {
    /// Records a finished refresh.
    fn record_refresh(&self, success: bool, duration: Duration);

    /// Records the number of links published by a refresh.
    fn record_links(&self, count: usize);

    /// Records an error.
    fn record_error(&self, error_kind: &str);

    /// Gets current metrics.
    fn get_metrics(&self) -> RefreshMetrics;

    /// Resets all metrics.
    fn reset(&self);
}

/// Refresh metrics snapshot.
#[derive(Debug, Clone, Default)]
pub struct RefreshMetrics {
    /// Total refreshes that finished.
    pub total_refreshes: u64,
    /// Refreshes that published new state.
    pub successful_refreshes: u64,
    /// Refreshes that failed and left state untouched.
    pub failed_refreshes: u64,
    /// Total latency in milliseconds.
    pub total_latency_ms: u64,
    /// Links published across all refreshes.
    pub links_published: u64,
    /// Error counts by kind.
    pub errors: HashMap<String, u64>,
}

impl RefreshMetrics {
    /// Calculates average latency in milliseconds.
    pub fn average_latency_ms(&self) -> f64 {
        if self.total_refreshes == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.total_refreshes as f64
        }
    }

    /// Calculates success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total_refreshes == 0 {
            100.0
        } else {
            (self.successful_refreshes as f64 / self.total_refreshes as f64) * 100.0
        }
    }
}

/// Default metrics collector implementation.
pub struct DefaultMetricsCollector {
    total_refreshes: AtomicU64,
    successful_refreshes: AtomicU64,
    failed_refreshes: AtomicU64,
    total_latency_ms: AtomicU64,
    links_published: AtomicU64,
    errors: RwLock<HashMap<String, u64>>,
}

impl DefaultMetricsCollector {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self {
            total_refreshes: AtomicU64::new(0),
            successful_refreshes: AtomicU64::new(0),
            failed_refreshes: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            links_published: AtomicU64::new(0),
            errors: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for DefaultMetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector for DefaultMetricsCollector {
    fn record_refresh(&self, success: bool, duration: Duration) {
        self.total_refreshes.fetch_add(1, Ordering::Relaxed);

        if success {
            self.successful_refreshes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_refreshes.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    fn record_links(&self, count: usize) {
        self.links_published
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    fn record_error(&self, error_kind: &str) {
        if let Ok(mut errors) = self.errors.write() {
            *errors.entry(error_kind.to_string()).or_insert(0) += 1;
        }
    }

    fn get_metrics(&self) -> RefreshMetrics {
        RefreshMetrics {
            total_refreshes: self.total_refreshes.load(Ordering::Relaxed),
            successful_refreshes: self.successful_refreshes.load(Ordering::Relaxed),
            failed_refreshes: self.failed_refreshes.load(Ordering::Relaxed),
            total_latency_ms: self.total_latency_ms.load(Ordering::Relaxed),
            links_published: self.links_published.load(Ordering::Relaxed),
            errors: self.errors.read().map(|e| e.clone()).unwrap_or_default(),
        }
    }

    fn reset(&self) {
        self.total_refreshes.store(0, Ordering::Relaxed);
        self.successful_refreshes.store(0, Ordering::Relaxed);
        self.failed_refreshes.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);
        self.links_published.store(0, Ordering::Relaxed);
        if let Ok(mut errors) = self.errors.write() {
            errors.clear();
        }
    }
}

impl std::fmt::Debug for DefaultMetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultMetricsCollector")
            .field("metrics", &self.get_metrics())
            .finish()
    }
}
