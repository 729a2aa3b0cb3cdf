//! Integration tests against a WireMock server.
//!
//! These exercise the full path: reqwest transport, bearer header, strict
//! decode and publication into the store.

use inopen_dashboard::observability::{LogLevel, Logger};
use inopen_dashboard::{
    DashboardClient, DashboardError, DashboardResponse, DashboardStore, FetchOutcome,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SAMPLE: &str = include_str!("fixtures/dashboard.json");
const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJpZCI6MX0.c2lnbmF0dXJl";

/// Logger that keeps every entry for inspection.
#[derive(Default)]
struct CapturingLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl CapturingLogger {
    fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().unwrap().clone()
    }
}

impl Logger for CapturingLogger {
    fn log(&self, level: LogLevel, message: &str, _context: Option<&HashMap<String, String>>) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

fn client_for(server: &MockServer, logger: Arc<CapturingLogger>) -> DashboardClient {
    DashboardClient::builder()
        .api_token(TOKEN)
        .base_url(format!("{}/api/v1", server.uri()))
        .timeout(Duration::from_secs(2))
        .logger(logger)
        .build()
        .unwrap()
}

fn dashboard_mock() -> wiremock::MockBuilder {
    let authorization = format!("Bearer {}", TOKEN);
    Mock::given(method("GET"))
        .and(path("/api/v1/dashboardNew"))
        .and(header("Authorization", authorization.as_str()))
}

fn sample_body() -> serde_json::Value {
    serde_json::from_str(SAMPLE).unwrap()
}

#[tokio::test]
async fn test_store_publishes_fetched_dashboard() {
    let server = MockServer::start().await;
    dashboard_mock()
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
        .expect(1)
        .mount(&server)
        .await;

    let logger = Arc::new(CapturingLogger::default());
    let store = DashboardStore::start(Arc::new(client_for(&server, logger.clone()))).unwrap();
    store.wait_idle().await;

    let decoded = DashboardResponse::from_slice(SAMPLE.as_bytes()).unwrap();
    let titles = |links: Vec<inopen_dashboard::Link>| -> Vec<String> {
        links.into_iter().map(|l| l.title).collect()
    };

    assert_eq!(titles(store.top_links()), titles(decoded.data.top_links));
    assert_eq!(titles(store.recent_links()), titles(decoded.data.recent_links));
    assert_eq!(store.chart_points().len(), 3);
    assert!(logger.entries().is_empty());
}

#[tokio::test]
async fn test_transport_failure_keeps_published_state() {
    // A dedicated server, so dropping it really closes the port
    let server = MockServer::builder().start().await;
    dashboard_mock()
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
        .mount(&server)
        .await;

    let logger = Arc::new(CapturingLogger::default());
    let store = DashboardStore::start(Arc::new(client_for(&server, logger.clone()))).unwrap();
    store.wait_idle().await;
    let before = store.snapshot();
    assert!(!before.is_empty());

    // Nothing listens on the port any more
    drop(server);

    assert_eq!(store.refresh().await.unwrap(), FetchOutcome::Failed);
    assert_eq!(*store.snapshot(), *before);

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, LogLevel::Error);
}

#[tokio::test]
async fn test_error_status_keeps_published_state() {
    let server = MockServer::start().await;
    dashboard_mock()
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    dashboard_mock()
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let logger = Arc::new(CapturingLogger::default());
    let store = DashboardStore::start(Arc::new(client_for(&server, logger.clone()))).unwrap();
    store.wait_idle().await;
    let before = store.snapshot();

    assert_eq!(store.refresh().await.unwrap(), FetchOutcome::Failed);
    assert_eq!(*store.snapshot(), *before);
    assert_eq!(logger.entries().len(), 1);
    assert!(logger.entries()[0].1.contains("500"));
}

#[tokio::test]
async fn test_wrong_token_is_not_matched() {
    let server = MockServer::start().await;
    dashboard_mock()
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
        .expect(0)
        .mount(&server)
        .await;

    let client = DashboardClient::builder()
        .api_token("some.other.token")
        .base_url(format!("{}/api/v1", server.uri()))
        .build()
        .unwrap();

    let error = client.dashboard().fetch().await.unwrap_err();
    assert!(error.is_transport());
}

#[tokio::test]
async fn test_missing_data_is_decode_error() {
    let server = MockServer::start().await;
    let mut body = sample_body();
    body.as_object_mut().unwrap().remove("data");
    dashboard_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(CapturingLogger::default()));
    let error = client.dashboard().fetch().await.unwrap_err();

    assert!(matches!(error, DashboardError::Decode { .. }));
}

#[tokio::test]
async fn test_chart_points_projection() {
    let server = MockServer::start().await;
    let mut body = sample_body();
    body["data"]["overall_url_chart"] = serde_json::json!({ "A": 3, "B": 5 });
    dashboard_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let store = DashboardStore::start(Arc::new(client_for(
        &server,
        Arc::new(CapturingLogger::default()),
    )))
    .unwrap();
    store.wait_idle().await;

    let mut points: Vec<(String, f64)> = store
        .chart_points()
        .into_iter()
        .map(|p| (p.label, p.value))
        .collect();
    points.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(
        points,
        vec![("A".to_string(), 3.0), ("B".to_string(), 5.0)]
    );
}

#[tokio::test]
async fn test_raw_response_logging_is_opt_in() {
    let server = MockServer::start().await;
    dashboard_mock()
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
        .mount(&server)
        .await;

    let quiet = Arc::new(CapturingLogger::default());
    client_for(&server, quiet.clone())
        .dashboard()
        .fetch()
        .await
        .unwrap();
    assert!(quiet.entries().is_empty());

    let verbose = Arc::new(CapturingLogger::default());
    let client = DashboardClient::builder()
        .api_token(TOKEN)
        .base_url(format!("{}/api/v1", server.uri()))
        .log_raw_response(true)
        .logger(verbose.clone())
        .build()
        .unwrap();
    client.dashboard().fetch().await.unwrap();

    let entries = verbose.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, LogLevel::Debug);
    assert!(entries[0].1.contains("\"top_links\""));
}

#[tokio::test]
async fn test_link_identity_is_decode_local() {
    let server = MockServer::start().await;
    dashboard_mock()
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(CapturingLogger::default()));
    let first = client.dashboard().fetch().await.unwrap();
    let second = client.dashboard().fetch().await.unwrap();

    let a = &first.data.top_links[0];
    let b = &second.data.top_links[0];
    assert_eq!(a.url_id, b.url_id);
    assert_ne!(a.id, b.id);

    // The same url_id appears in both lists within one decode, still distinct
    let recent_spring = &first.data.recent_links[0];
    let top_spring = &first.data.top_links[1];
    assert_eq!(recent_spring.url_id, top_spring.url_id);
    assert_ne!(recent_spring.id, top_spring.id);
}
