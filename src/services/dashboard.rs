//! Dashboard service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::auth::AuthProvider;
use crate::errors::{DashboardError, DashboardResult};
use crate::observability::Logger;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::types::DashboardResponse;

/// Service owning the dashboard round-trip: one authenticated GET, then a
/// strict decode of the body.
pub struct DashboardService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    logger: Arc<dyn Logger>,
    path: String,
    timeout: Option<Duration>,
    custom_headers: Vec<(String, String)>,
    log_raw_response: bool,
}

impl DashboardService {
    /// Creates a new dashboard service for the given endpoint path.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        logger: Arc<dyn Logger>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            auth,
            logger,
            path: path.into(),
            timeout: None,
            custom_headers: Vec::new(),
            log_raw_response: false,
        }
    }

    /// Sets a per-request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds headers sent with every request.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.custom_headers = headers;
        self
    }

    /// Logs each raw response body at debug level before decoding.
    pub fn with_raw_response_logging(mut self, enabled: bool) -> Self {
        self.log_raw_response = enabled;
        self
    }

    /// Fetches and decodes the dashboard.
    #[instrument(skip(self), fields(path = %self.path))]
    pub async fn fetch(&self) -> DashboardResult<DashboardResponse> {
        let http_request = self.build_request();

        let response = self.transport.send(http_request).await?;

        self.parse_response(response)
    }

    /// Builds the HTTP request.
    fn build_request(&self) -> HttpRequest {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        for (name, value) in &self.custom_headers {
            if name.eq_ignore_ascii_case("authorization") {
                tracing::warn!(header = %name, "Ignoring custom credential header");
                continue;
            }
            headers.insert(name.clone(), value.clone());
        }

        self.auth.apply_auth(&mut headers);

        HttpRequest {
            headers,
            timeout: self.timeout,
            ..HttpRequest::get(self.path.as_str())
        }
    }

    /// Parses the HTTP response.
    fn parse_response(&self, response: HttpResponse) -> DashboardResult<DashboardResponse> {
        if !response.is_success() {
            tracing::debug!(status = response.status, "Dashboard request rejected");
            return Err(DashboardError::Transport(TransportError::Status {
                status: response.status,
            }));
        }

        if self.log_raw_response {
            self.logger
                .debug(&format!("Raw dashboard response: {}", response.text()));
        }

        DashboardResponse::from_slice(&response.body)
    }
}

impl std::fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService")
            .field("path", &self.path)
            .field("timeout", &self.timeout)
            .field("log_raw_response", &self.log_raw_response)
            .finish()
    }
}
