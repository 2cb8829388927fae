use crate::{Configuration, Result};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// One pooled HTTP transport per client instance.
///
/// Connections are reused across all concurrent calls; the number of exchanges
/// in flight at once is bounded by `max_connections_per_route` permits, so the
/// pool never needs to open more than that many connections to the endpoint.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    permits: Arc<Semaphore>,
    max_connections: usize,
}

/// What came back from one completed exchange, body fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub content_type: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

impl HttpTransport {
    pub fn new(cfg: &Configuration) -> Result<Self> {
        let base_url = cfg.endpoint_url()?;
        let max_connections = cfg.max_connections_per_route.max(1);

        // No timeouts unless configured: callers opt in to bounded latency.
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(max_connections)
            .pool_idle_timeout(Some(Duration::from_secs(cfg.pool_idle_timeout_secs)));

        if let Some(timeout) = cfg.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = cfg.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url,
            permits: Arc::new(Semaphore::new(max_connections)),
            max_connections,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    pub fn available_connections(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.client.request(method, url)
    }

    /// Send the request and read the whole body while holding a connection permit.
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<RawResponse> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| TransportError::Other("connection pool closed".to_string()))?;

        let resp = request.send().await.map_err(TransportError::Http)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = resp.text().await.map_err(TransportError::Http)?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            content_type,
            headers,
            body,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
