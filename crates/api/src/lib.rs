//! Graph API client utilities.
//!
//! This crate provides the HTTP boundary for graphctl commands:
//!
//! - [`HttpTransport`], the narrow GET-only seam the engine depends on
//! - [`GraphClient`], the default `reqwest`-backed transport
//! - Base URL validation so bearer tokens are only ever sent to known hosts
//! - Bearer token discovery from `GRAPHCTL_ACCESS_TOKEN`
//!
//! # Example
//!
//! ```ignore
//! use graphctl_api::{GraphClient, HttpTransport};
//! use std::time::Duration;
//!
//! async fn run() -> Result<(), graphctl_api::ApiError> {
//!     let client = GraphClient::from_env("https://graph.microsoft.com", Duration::from_secs(30))?;
//!     let response = client.get("https://graph.microsoft.com/v1.0/me").await?;
//!     println!("status: {}", response.status);
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use thiserror::Error;
use tracing::debug;

/// Environment variable holding the bearer token used for every request.
pub const ACCESS_TOKEN_ENV: &str = "GRAPHCTL_ACCESS_TOKEN";

/// Default Graph endpoint.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com";

/// Allowed hostnames or base domains for non-local base URLs. Subdomains of
/// these domains are also allowed.
const ALLOWED_GRAPH_DOMAINS: &[&str] = &[
    "graph.microsoft.com",
    "graph.microsoft.us",
    "dod-graph.microsoft.us",
    "microsoftgraph.chinacloudapi.cn",
];
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Errors raised before an HTTP response is available.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Refusing to send credentials to '{url}': origin differs from {base_url}")]
    ForeignOrigin { url: String, base_url: String },

    #[error("could not build the HTTP client: {0}")]
    Client(String),

    /// The request failed without producing a response (DNS, TLS, timeout, ...).
    #[error("{message}")]
    Network { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// GET-only transport used by resolvers and the paginated fetcher.
///
/// Implementations attach credentials themselves; callers pass absolute
/// URLs (continuation links are absolute).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError>;
}

/// Thin wrapper around a configured `reqwest::Client` for Graph access.
#[derive(Debug, Clone)]
pub struct GraphClient {
    base_url: Url,
    http: Client,
    user_agent: String,
}

impl GraphClient {
    /// Construct a client that authenticates with `access_token` when given.
    ///
    /// Non-localhost base URLs must use HTTPS and be within an allowed Graph
    /// domain.
    pub fn new(base_url: &str, access_token: Option<&str>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = validate_base_url(base_url)?;

        let mut default_headers = header::HeaderMap::new();
        if let Some(token) = access_token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|error| ApiError::Client(format!("invalid access token: {}", error)))?;
            default_headers.insert(header::AUTHORIZATION, value);
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .map_err(|error| ApiError::Client(error.to_string()))?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("graphctl/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Construct a client using the token from [`ACCESS_TOKEN_ENV`], if set.
    pub fn from_env(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let token = env::var(ACCESS_TOKEN_ENV).ok().filter(|token| !token.trim().is_empty());
        Self::new(base_url, token.as_deref(), timeout)
    }

    /// Base URL without a trailing slash, e.g. `https://graph.microsoft.com`.
    pub fn base_url(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }

    fn ensure_same_origin(&self, url: &str) -> Result<Url, ApiError> {
        let parsed = Url::parse(url).map_err(|error| ApiError::network(format!("Invalid request URL '{}': {}", url, error)))?;
        if parsed.origin() != self.base_url.origin() {
            return Err(ApiError::ForeignOrigin {
                url: url.to_string(),
                base_url: self.base_url(),
            });
        }
        Ok(parsed)
    }
}

#[async_trait]
impl HttpTransport for GraphClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
        let url = self.ensure_same_origin(url)?;
        debug!(%url, "sending GET");

        let response = self
            .http
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|error| ApiError::network(error.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|error| ApiError::network(error.to_string()))?;
        debug!(status, body_len = body.len(), "received response");
        Ok(HttpResponse { status, body })
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS, and host must be one of the allowed
///   Graph domains or a subdomain thereof
fn validate_base_url(base: &str) -> Result<Url, ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let parsed = Url::parse(base).map_err(|error| invalid(error.to_string()))?;
    let host_name = parsed.host_str().ok_or_else(|| invalid("URL must include a host".into()))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(parsed);
    }

    if parsed.scheme() != "https" {
        return Err(invalid(format!(
            "must use https for non-localhost hosts; got '{}://'",
            parsed.scheme()
        )));
    }

    let is_allowed_domain = ALLOWED_GRAPH_DOMAINS.iter().any(|&allowed_domain| {
        host_name.eq_ignore_ascii_case(allowed_domain) || host_name.ends_with(&format!(".{}", allowed_domain))
    });
    if !is_allowed_domain {
        return Err(invalid(format!(
            "host '{}' is not allowed; must be one of {:?} or a subdomain, or localhost",
            host_name, ALLOWED_GRAPH_DOMAINS
        )));
    }

    Ok(parsed)
}
