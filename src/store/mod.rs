//! Observable dashboard state.
//!
//! [`DashboardStore`] owns the three collections a presentation layer
//! renders (top links, recent links and chart points) and refreshes them
//! from the dashboard endpoint.
//!
//! State is published through a `tokio::sync::watch` channel as a single
//! [`DashboardSnapshot`], so observers always see the three collections
//! change together. A failed refresh is logged to the diagnostic logger and
//! leaves the published snapshot untouched.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use inopen_dashboard::{DashboardClient, DashboardStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(DashboardClient::from_env()?);
//!     let store = DashboardStore::start(client)?;
//!
//!     let mut updates = store.subscribe();
//!     while updates.changed().await.is_ok() {
//!         let snapshot = updates.borrow_and_update().clone();
//!         println!("{} top links", snapshot.top_links.len());
//!     }
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::client::DashboardClient;
use crate::errors::{DashboardError, DashboardResult};
use crate::observability::RequestTimer;
use crate::types::{ChartPoint, DashboardData, Link};

/// Everything the presentation layer renders, published as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Most clicked links, in backend order.
    pub top_links: Vec<Link>,
    /// Most recent links, in backend order.
    pub recent_links: Vec<Link>,
    /// Chart breakdown, in no particular order.
    pub chart_points: Vec<ChartPoint>,
    /// When this snapshot was decoded. `None` until the first success.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl DashboardSnapshot {
    /// Builds a snapshot from decoded dashboard data.
    pub fn from_data(data: DashboardData) -> Self {
        let chart_points = data.chart_points();
        Self {
            top_links: data.top_links,
            recent_links: data.recent_links,
            chart_points,
            fetched_at: Some(Utc::now()),
        }
    }

    /// Returns true until a refresh has succeeded.
    pub fn is_empty(&self) -> bool {
        self.fetched_at.is_none()
    }
}

/// How a single refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response decoded and a new snapshot was published.
    Decoded,
    /// The fetch failed; published state was left untouched.
    Failed,
}

struct StoreState {
    client: Arc<DashboardClient>,
    snapshot: watch::Sender<Arc<DashboardSnapshot>>,
    in_flight: watch::Sender<usize>,
}

/// Decrements the in-flight count when a refresh task ends, even if the
/// task is aborted.
struct InFlightGuard(Arc<StoreState>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.in_flight.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Observable dashboard state, refreshed from the dashboard endpoint.
///
/// Refreshes are fire-and-forget and are never deduplicated or cancelled.
/// When several overlap, whichever completes last determines the
/// published snapshot.
#[derive(Clone)]
pub struct DashboardStore {
    state: Arc<StoreState>,
    runtime: Handle,
}

impl DashboardStore {
    /// Creates the store and triggers its first refresh.
    ///
    /// Must be called from within a Tokio runtime; refresh tasks always run
    /// on that runtime, wherever `refresh` is later called from.
    pub fn start(client: Arc<DashboardClient>) -> DashboardResult<Self> {
        let runtime = Handle::try_current().map_err(|_| {
            DashboardError::configuration("DashboardStore must be started inside a Tokio runtime")
        })?;

        let (snapshot, _) = watch::channel(Arc::new(DashboardSnapshot::default()));
        let (in_flight, _) = watch::channel(0usize);

        let store = Self {
            state: Arc::new(StoreState {
                client,
                snapshot,
                in_flight,
            }),
            runtime,
        };

        store.refresh();
        Ok(store)
    }

    /// Starts a refresh in the background.
    ///
    /// The returned handle resolves once the refresh has published or
    /// failed; dropping it does not cancel the refresh.
    pub fn refresh(&self) -> JoinHandle<FetchOutcome> {
        self.state.in_flight.send_modify(|n| *n += 1);
        let guard = InFlightGuard(Arc::clone(&self.state));
        let state = Arc::clone(&self.state);

        let span = tracing::info_span!("dashboard_refresh");
        self.runtime.spawn(
            async move {
                let outcome = run_refresh(&state).await;
                drop(guard);
                outcome
            }
            .instrument(span),
        )
    }

    /// Returns the currently published snapshot.
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        Arc::clone(&*self.state.snapshot.borrow())
    }

    /// Returns the published top links.
    pub fn top_links(&self) -> Vec<Link> {
        self.state.snapshot.borrow().top_links.clone()
    }

    /// Returns the published recent links.
    pub fn recent_links(&self) -> Vec<Link> {
        self.state.snapshot.borrow().recent_links.clone()
    }

    /// Returns the published chart points.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.state.snapshot.borrow().chart_points.clone()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.state.snapshot.subscribe()
    }

    /// Number of refreshes currently waiting on the network.
    pub fn in_flight(&self) -> usize {
        *self.state.in_flight.borrow()
    }

    /// Waits until no refresh is in flight.
    pub async fn wait_idle(&self) {
        let mut in_flight = self.state.in_flight.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = in_flight.wait_for(|n| *n == 0).await;
    }

    /// Returns the client used for refreshes.
    pub fn client(&self) -> &Arc<DashboardClient> {
        &self.state.client
    }
}

impl std::fmt::Debug for DashboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardStore")
            .field("in_flight", &self.in_flight())
            .field("fetched_at", &self.snapshot().fetched_at)
            .finish()
    }
}

async fn run_refresh(state: &StoreState) -> FetchOutcome {
    let observability = state.client.observability();
    let timer = RequestTimer::start();

    match state.client.dashboard().fetch().await {
        Ok(response) => {
            let snapshot = DashboardSnapshot::from_data(response.data);
            let links = snapshot.top_links.len() + snapshot.recent_links.len();

            tracing::info!(
                top_links = snapshot.top_links.len(),
                recent_links = snapshot.recent_links.len(),
                chart_points = snapshot.chart_points.len(),
                "Dashboard refreshed"
            );

            state.snapshot.send_replace(Arc::new(snapshot));
            observability.record_success(timer.elapsed(), links);
            FetchOutcome::Decoded
        }
        Err(error) => {
            observability
                .logger()
                .error(&format!("Dashboard refresh failed: {}", error));
            observability.record_failure(timer.elapsed(), error.kind());
            FetchOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockTransport, RecordingLogger};
    use crate::observability::LogLevel;
    use crate::transport::TransportError;
    use crate::types::DashboardResponse;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const SAMPLE: &str = include_str!("../../tests/fixtures/dashboard.json");

    fn client(transport: Arc<MockTransport>, logger: Arc<RecordingLogger>) -> Arc<DashboardClient> {
        Arc::new(
            DashboardClient::builder()
                .api_token("header.payload.signature")
                .transport(transport)
                .logger(logger)
                .build()
                .unwrap(),
        )
    }

    fn sample_with_title(title: &str) -> String {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value["data"]["top_links"][0]["title"] = serde_json::json!(title);
        value.to_string()
    }

    #[tokio::test]
    async fn test_start_triggers_first_refresh() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::body(200, SAMPLE));
        let logger = Arc::new(RecordingLogger::new());

        let store = DashboardStore::start(client(transport.clone(), logger.clone())).unwrap();
        assert_eq!(store.in_flight(), 1);
        assert!(store.snapshot().is_empty());

        store.wait_idle().await;

        assert_eq!(transport.request_count(), 1);
        assert_eq!(store.in_flight(), 0);
        assert!(!store.snapshot().is_empty());
        assert!(logger.entries().is_empty());
    }

    #[tokio::test]
    async fn test_published_links_match_decoded_order() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::body(200, SAMPLE));

        let store =
            DashboardStore::start(client(transport, Arc::new(RecordingLogger::new()))).unwrap();
        store.wait_idle().await;

        let decoded = DashboardResponse::from_slice(SAMPLE.as_bytes()).unwrap();
        let top: Vec<i64> = store.top_links().iter().map(|l| l.url_id).collect();
        let recent: Vec<i64> = store.recent_links().iter().map(|l| l.url_id).collect();
        let expected_top: Vec<i64> = decoded.data.top_links.iter().map(|l| l.url_id).collect();
        let expected_recent: Vec<i64> =
            decoded.data.recent_links.iter().map(|l| l.url_id).collect();

        assert_eq!(top, expected_top);
        assert_eq!(recent, expected_recent);
        assert_eq!(store.top_links()[0].title, decoded.data.top_links[0].title);

        let mut chart: Vec<(String, f64)> = store
            .chart_points()
            .into_iter()
            .map(|p| (p.label, p.value))
            .collect();
        chart.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            chart,
            vec![
                ("00:00".to_string(), 3.0),
                ("01:00".to_string(), 0.0),
                ("02:00".to_string(), 11.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::body(200, SAMPLE));
        transport.queue_failure(TransportError::Connection {
            message: "network unreachable".to_string(),
        });
        let logger = Arc::new(RecordingLogger::new());

        let store = DashboardStore::start(client(transport, logger.clone())).unwrap();
        store.wait_idle().await;
        let before = store.snapshot();

        let outcome = store.refresh().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(*store.snapshot(), *before);

        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Error);
        assert!(entries[0].message.contains("network unreachable"));
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_previous_snapshot() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::body(200, SAMPLE));
        transport.queue(MockResponse::body(200, r#"{"status": false, "message": "oops"}"#));
        let logger = Arc::new(RecordingLogger::new());

        let store = DashboardStore::start(client(transport, logger.clone())).unwrap();
        store.wait_idle().await;
        let before = store.snapshot();

        assert_eq!(store.refresh().await.unwrap(), FetchOutcome::Failed);
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(logger.entries_at(LogLevel::Error).len(), 1);

        let metrics = store.client().observability().metrics().get_metrics();
        assert_eq!(metrics.successful_refreshes, 1);
        assert_eq!(metrics.failed_refreshes, 1);
        assert_eq!(metrics.errors.get("decode"), Some(&1));
    }

    #[tokio::test]
    async fn test_initial_failure_leaves_empty_state() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::body(503, "unavailable"));
        let logger = Arc::new(RecordingLogger::new());

        let store = DashboardStore::start(client(transport, logger.clone())).unwrap();
        store.wait_idle().await;

        assert!(store.snapshot().is_empty());
        assert!(store.top_links().is_empty());
        assert!(store.recent_links().is_empty());
        assert!(store.chart_points().is_empty());
        assert_eq!(logger.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_one_change_per_success() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::body(200, SAMPLE));
        transport.queue(MockResponse::body(200, sample_with_title("Renamed")));

        let store =
            DashboardStore::start(client(transport, Arc::new(RecordingLogger::new()))).unwrap();
        let mut updates = store.subscribe();
        store.wait_idle().await;

        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().top_links.len(), 2);

        assert_eq!(store.refresh().await.unwrap(), FetchOutcome::Decoded);
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().top_links[0].title, "Renamed");
    }

    #[tokio::test]
    async fn test_overlapping_refreshes_last_completion_wins() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(
            MockResponse::body(200, sample_with_title("slow")).with_delay(Duration::from_millis(80)),
        );
        transport.queue(MockResponse::body(200, sample_with_title("fast")));

        let store =
            DashboardStore::start(client(transport.clone(), Arc::new(RecordingLogger::new())))
                .unwrap();
        let second = store.refresh();
        assert_eq!(store.in_flight(), 2);

        assert_eq!(second.await.unwrap(), FetchOutcome::Decoded);
        store.wait_idle().await;

        assert_eq!(transport.request_count(), 2);
        assert_eq!(store.top_links()[0].title, "slow");
    }

    #[tokio::test]
    async fn test_each_refresh_mints_new_link_ids() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::body(200, SAMPLE));
        transport.queue(MockResponse::body(200, SAMPLE));

        let store =
            DashboardStore::start(client(transport, Arc::new(RecordingLogger::new()))).unwrap();
        store.wait_idle().await;
        let first = store.top_links();

        store.refresh().await.unwrap();
        let second = store.top_links();

        assert_eq!(first[0].url_id, second[0].url_id);
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let transport = Arc::new(MockTransport::new());
        let result = DashboardStore::start(client(transport, Arc::new(RecordingLogger::new())));

        assert!(matches!(result, Err(DashboardError::Configuration { .. })));
    }
}
