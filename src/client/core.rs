use crate::client::error_classification::{classify_decode_failure, classify_response};
use crate::client::request::{OutboundRequest, QueryParams};
use crate::client::signals::{ConnectionSnapshot, SignalsSnapshot};
use crate::context::CallContext;
use crate::resilience::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::transport::HttpTransport;
use crate::{Configuration, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub const HEADER_ACCESS_TOKEN: &str = "X-Access-Token";
pub const HEADER_FORWARDED_FOR: &str = "X-Forwarded-For";
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Request executor: every remote call goes through here.
///
/// One instance owns one pooled transport and one rate limiter; clone it (cheap,
/// `Arc`-backed) to share both across tasks.
#[derive(Debug, Clone)]
pub struct HttpClient {
    pub(crate) config: Arc<Configuration>,
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) rate_limiter: Arc<RateLimiter>,
}

impl HttpClient {
    pub fn new(config: Configuration) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::new(&config)?);
        let rate_limiter = Arc::new(RateLimiter::new(RateLimiterConfig::from_configuration(
            &config,
        )));
        Ok(Self {
            config: Arc::new(config),
            transport,
            rate_limiter,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Snapshot current connection and rate limiter usage.
    pub async fn signals(&self) -> SignalsSnapshot {
        let rate_limiter = if self.config.block_till_rate_limit_reset {
            Some(self.rate_limiter.snapshot().await)
        } else {
            None
        };

        SignalsSnapshot {
            endpoint: self.transport.base_url().to_string(),
            connections: ConnectionSnapshot::new(
                self.transport.max_connections(),
                self.transport.available_connections(),
            ),
            rate_limiter,
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        path: &str,
        params: &QueryParams,
    ) -> Result<Option<T>> {
        self.execute(ctx, OutboundRequest::get(path, params.clone()))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        path: &str,
        payload: &B,
    ) -> Result<Option<T>> {
        self.execute(ctx, OutboundRequest::post(path, payload)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        path: &str,
        params: &QueryParams,
    ) -> Result<Option<T>> {
        self.execute(ctx, OutboundRequest::delete(path, params.clone()))
            .await
    }

    /// Execute exactly one HTTP exchange and decode the result.
    ///
    /// Returns `Ok(None)` for a success response without a body.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        request: OutboundRequest,
    ) -> Result<Option<T>> {
        let url = request.resolve_url(self.transport.base_url())?;

        if self.config.block_till_rate_limit_reset {
            self.rate_limiter.acquire().await;
        }

        let request_id = Uuid::new_v4().to_string();
        let user_agent = ctx.user_agent().unwrap_or(&self.config.user_agent);

        let mut builder = self
            .transport
            .request(request.method.into(), url)
            .header(HEADER_ACCESS_TOKEN, &self.config.access_token)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, "application/json")
            .header(HEADER_REQUEST_ID, &request_id);

        if let Some(token) = ctx.auth_token() {
            builder = builder.header(AUTHORIZATION, format!("Basic {}", token));
        }
        if let Some(ip) = ctx.ip_address() {
            builder = builder.header(HEADER_FORWARDED_FOR, ip);
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(body);
        }

        debug!(
            method = request.method.as_str(),
            path = request.path.as_str(),
            request_id = request_id.as_str(),
            authenticated = ctx.is_authenticated(),
            "dispatching request"
        );

        let connections = ConnectionSnapshot::new(
            self.transport.max_connections(),
            self.transport.available_connections(),
        );
        if connections.is_exhausted() {
            debug!(
                max_connections = connections.max,
                request_id = request_id.as_str(),
                "all connections busy, waiting for a permit"
            );
        }

        let start = std::time::Instant::now();
        let resp = match self.transport.send(builder).await {
            Ok(resp) => resp,
            Err(e) => {
                info!(
                    method = request.method.as_str(),
                    path = request.path.as_str(),
                    request_id = request_id.as_str(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "stuffusell request did not complete"
                );
                return Err(e);
            }
        };

        if !resp.is_success() {
            let err = classify_response(&resp);
            info!(
                http_status = resp.status,
                error_kind = ?err.kind(),
                path = request.path.as_str(),
                request_id = request_id.as_str(),
                duration_ms = start.elapsed().as_millis() as u64,
                "stuffusell request failed"
            );
            return Err(err);
        }

        debug!(
            http_status = resp.status,
            path = request.path.as_str(),
            request_id = request_id.as_str(),
            duration_ms = start.elapsed().as_millis() as u64,
            "request completed"
        );

        if !resp.has_body() {
            return Ok(None);
        }

        serde_json::from_str::<T>(&resp.body)
            .map(Some)
            .map_err(|e| classify_decode_failure(resp.status, &resp.reason, &resp.body, e))
    }
}
