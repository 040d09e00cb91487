use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use graphctl_api::HttpTransport;
use graphctl_util::{DEFAULT_MAX_PAGES, parse_response_json_strict};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::GraphError;
use crate::logger::{Logger, TelemetrySink, TracingTelemetrySink};

/// Collaborators and limits for exactly one command invocation.
///
/// A context is created per invocation, so concurrent invocations in one
/// process never share telemetry or cancellation state.
#[derive(Clone)]
pub struct InvocationContext {
    transport: Arc<dyn HttpTransport>,
    logger: Arc<dyn Logger>,
    telemetry: Arc<dyn TelemetrySink>,
    resource: String,
    max_pages: usize,
    cancellation: CancellationToken,
}

impl InvocationContext {
    /// `resource` is the Graph base URL, e.g. `https://graph.microsoft.com`.
    pub fn new(transport: Arc<dyn HttpTransport>, logger: Arc<dyn Logger>, resource: impl Into<String>) -> Self {
        Self {
            transport,
            logger,
            telemetry: Arc::new(TracingTelemetrySink),
            resource: resource.into().trim_end_matches('/').to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Page ceiling for every collection fetched in this invocation. Values
    /// below one are raised to one.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn telemetry(&self) -> &dyn TelemetrySink {
        self.telemetry.as_ref()
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Build an absolute Graph URL from an API-relative path such as
    /// `/v1.0/me/onenote/notebooks`.
    pub fn graph_url(&self, path: &str) -> String {
        format!("{}{}", self.resource, path)
    }

    /// Await `future` unless the invocation is cancelled first.
    pub async fn cancellable<F, T>(&self, future: F) -> Result<T, GraphError>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(GraphError::Cancelled),
            output = future => Ok(output),
        }
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// Non-success statuses become [`GraphError::Http`] carrying the parsed
    /// body when there is one. A success status with a non-JSON body is a
    /// malformed response.
    pub async fn get_json(&self, url: &str) -> Result<Value, GraphError> {
        let start = Instant::now();
        debug!(%url, "graph request started");
        let response = self.cancellable(self.transport.get(url)).await??;

        if !response.is_success() {
            warn!(
                %url,
                status = response.status,
                duration_ms = start.elapsed().as_millis(),
                "graph request failed"
            );
            let body = serde_json::from_str::<Value>(&response.body).ok();
            return Err(GraphError::Http {
                status: response.status,
                body,
            });
        }

        let parsed = parse_response_json_strict(&response.body, Some(response.status))
            .map_err(|error| GraphError::malformed(url, error.to_string()))?;
        debug!(
            %url,
            status = response.status,
            duration_ms = start.elapsed().as_millis(),
            "graph request completed"
        );
        Ok(parsed)
    }
}
