//! In-memory collaborators for exercising commands without a network.
//!
//! [`RecordingTransport`] answers from an exact-URL route table and records
//! every request, so tests can assert both what was fetched and how often.
//! Requests to an unknown URL fail with `Invalid request <url>`.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use graphctl_api::{ApiError, HttpResponse, HttpTransport};
use graphctl_types::TelemetryProperties;
use serde_json::Value;

use crate::context::InvocationContext;
use crate::logger::{Logger, TelemetrySink};

/// A context against `https://graph.microsoft.com` whose transport has no
/// routes, for exercising checks that must not reach the network.
pub fn offline_context() -> InvocationContext {
    InvocationContext::new(
        Arc::new(RecordingTransport::new()),
        Arc::new(RecordingLogger::default()),
        "https://graph.microsoft.com",
    )
}

#[derive(Debug, Clone)]
enum Canned {
    Response(HttpResponse),
    Failure(String),
}

/// Route table of canned responses keyed by absolute URL.
///
/// Several responses registered for one URL are served in order; the last
/// one repeats once the queue is down to it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    routes: Mutex<HashMap<String, VecDeque<Canned>>>,
    requests: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.route(url.into(), Canned::Response(HttpResponse::new(status, body)))
    }

    pub fn respond_json(self, url: impl Into<String>, body: Value) -> Self {
        self.respond(url, 200, body.to_string())
    }

    /// The request to `url` fails without a response.
    pub fn fail(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.route(url.into(), Canned::Failure(message.into()))
    }

    fn route(self, url: String, canned: Canned) -> Self {
        if let Ok(mut routes) = self.routes.lock() {
            routes.entry(url).or_default().push_back(canned);
        }
        self
    }

    /// Every requested URL in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or_default()
    }

    fn next_for(&self, url: &str) -> Option<Canned> {
        let mut routes = self.routes.lock().ok()?;
        let queue = routes.get_mut(url)?;
        if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() }
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.next_for(url) {
            Some(Canned::Response(response)) => Ok(response),
            Some(Canned::Failure(message)) => Err(ApiError::network(message)),
            None => Err(ApiError::network(format!("Invalid request {}", url))),
        }
    }
}

/// Captures everything a command logs.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<Value>>,
    stderr: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<Value> {
        self.entries.lock().map(|entries| entries.clone()).unwrap_or_default()
    }

    pub fn log_count(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or_default()
    }

    pub fn stderr(&self) -> Vec<String> {
        self.stderr.lock().map(|lines| lines.clone()).unwrap_or_default()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, value: Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(value);
        }
    }

    fn log_to_stderr(&self, message: &str) {
        if let Ok(mut lines) = self.stderr.lock() {
            lines.push(message.to_string());
        }
    }
}

/// Captures tracked telemetry as `(command name, properties)` pairs.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<(String, TelemetryProperties)>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<(String, TelemetryProperties)> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn track(&self, command_name: &str, properties: &TelemetryProperties) {
        if let Ok(mut events) = self.events.lock() {
            events.push((command_name.to_string(), properties.clone()));
        }
    }
}
