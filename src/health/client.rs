//! HTTP client seam used by probes.
//!
//! # Responsibilities
//! - Issue a single GET with a per-request timeout
//! - Map transport failures onto [`ErrorKind`]
//! - Hand out clients keyed by probe description
//!
//! # Design Decisions
//! - The timeout travels with each call; clients are never mutated after
//!   construction, so one pooled client can back many probes
//! - Response bodies are ignored, only the status code matters

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use dashmap::DashMap;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time;
use url::Url;

use crate::config::schema::ClientConfig;
use crate::health::result::ErrorKind;

/// A transport-level failure: no usable HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct TransportError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub(crate) fn timed_out(timeout: Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("no response within {} ms", timeout.as_millis()),
        )
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            ErrorKind::Timeout
        } else if e.is_connect() {
            ErrorKind::Connect
        } else if e.is_builder() || e.is_redirect() {
            ErrorKind::Request
        } else {
            ErrorKind::Protocol
        };
        Self::new(kind, error_chain(&e))
    }
}

impl From<hyper_util::client::legacy::Error> for TransportError {
    fn from(e: hyper_util::client::legacy::Error) -> Self {
        let kind = if e.is_connect() {
            ErrorKind::Connect
        } else {
            ErrorKind::Protocol
        };
        Self::new(kind, error_chain(&e))
    }
}

/// Render an error with all of its sources, outermost first.
fn error_chain(e: &dyn StdError) -> String {
    let mut rendered = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

/// Minimal HTTP capability a probe needs.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send `GET url`, giving up after `timeout`.
    async fn get(&self, url: &Url, timeout: Duration) -> Result<StatusCode, TransportError>;
}

/// Produces the client a probe should use, keyed by probe description.
pub trait ClientFactory: Send + Sync {
    fn create_client(&self, name: &str) -> Result<Arc<dyn HttpClient>, TransportError>;
}

/// `reqwest`-backed client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs));
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }
        let inner = builder.build()?;
        Ok(Self { inner })
    }

    /// Wrap an existing client, e.g. one already shared by the host service.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<StatusCode, TransportError> {
        let response = self
            .inner
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await?;
        Ok(response.status())
    }
}

/// Plain-HTTP client on the `hyper_util` legacy pool. Does not speak TLS.
#[derive(Clone)]
pub struct HyperClient {
    client: Client<HttpConnector, Body>,
    user_agent: String,
}

impl HyperClient {
    pub fn new(config: &ClientConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_millis(config.connect_timeout_ms)));

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .build(connector);

        Self {
            client,
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl HttpClient for HyperClient {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<StatusCode, TransportError> {
        if url.scheme() != "http" {
            return Err(TransportError::new(
                ErrorKind::Request,
                format!(
                    "unsupported scheme '{}': HyperClient only speaks plain http",
                    url.scheme()
                ),
            ));
        }

        let request = Request::builder()
            .method("GET")
            .uri(url.as_str())
            .header("user-agent", self.user_agent.as_str())
            .body(Body::empty())
            .map_err(|e| TransportError::new(ErrorKind::Request, e.to_string()))?;

        match time::timeout(timeout, self.client.request(request)).await {
            Ok(Ok(response)) => Ok(response.status()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(TransportError::timed_out(timeout)),
        }
    }
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Hands every probe the same pooled client.
#[derive(Clone)]
pub struct SharedClientFactory {
    client: Arc<dyn HttpClient>,
}

impl SharedClientFactory {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }
}

impl ClientFactory for SharedClientFactory {
    fn create_client(&self, _name: &str) -> Result<Arc<dyn HttpClient>, TransportError> {
        Ok(self.client.clone())
    }
}

/// Builds one [`ReqwestClient`] per probe name and reuses it on later requests.
pub struct NamedClientFactory {
    config: ClientConfig,
    clients: DashMap<String, Arc<dyn HttpClient>>,
}

impl NamedClientFactory {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            clients: DashMap::new(),
        }
    }

    /// Number of distinct clients created so far.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl ClientFactory for NamedClientFactory {
    fn create_client(&self, name: &str) -> Result<Arc<dyn HttpClient>, TransportError> {
        if let Some(existing) = self.clients.get(name) {
            return Ok(existing.value().clone());
        }

        let client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(&self.config)?);
        let entry = self.clients.entry(name.to_string()).or_insert(client);
        tracing::debug!(probe = %name, "Created HTTP client for probe");
        Ok(entry.value().clone())
    }
}
