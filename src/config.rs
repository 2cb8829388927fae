//! Client configuration.
//!
//! A [`Configuration`] is built once (defaults, `with_*` methods, environment
//! variables or a YAML document) and then shared read-only by every call made
//! through one client instance.

use crate::{Error, ErrorContext, Result};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://www.stuffusell.co.uk";
pub const DEFAULT_USER_AGENT: &str = concat!("stuffusell-client-rust/", env!("CARGO_PKG_VERSION"));

const KEYRING_SERVICE: &str = "stuffusell";
const KEYRING_USER: &str = "access-token";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Base URL every request path is appended to.
    pub endpoint: String,
    /// Sent as `X-Access-Token` on every request.
    pub access_token: String,
    pub user_agent: String,
    pub requests_per_second: f64,
    pub burst_size: u32,
    pub max_connections_per_route: usize,
    /// When false the rate limiter is bypassed entirely.
    pub block_till_rate_limit_reset: bool,
    /// Whole-request timeout. `None` means no timeout.
    pub timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub pool_idle_timeout_secs: u64,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            requests_per_second: 10.0,
            burst_size: 10,
            max_connections_per_route: 20,
            block_till_rate_limit_reset: true,
            timeout_ms: None,
            connect_timeout_ms: None,
            pool_idle_timeout_secs: 90,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_requests_per_second(mut self, rps: f64) -> Self {
        self.requests_per_second = rps;
        self
    }

    pub fn with_burst_size(mut self, burst: u32) -> Self {
        self.burst_size = burst;
        self
    }

    pub fn with_max_connections_per_route(mut self, n: usize) -> Self {
        self.max_connections_per_route = n;
        self
    }

    pub fn with_block_till_rate_limit_reset(mut self, enable: bool) -> Self {
        self.block_till_rate_limit_reset = enable;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    /// Build a configuration from defaults overridden by `SUS_*` environment variables.
    ///
    /// - `SUS_ENDPOINT`, `SUS_USER_AGENT`
    /// - `SUS_ACCESS_TOKEN` (falls back to the OS keyring entry `stuffusell/access-token`)
    /// - `SUS_RPS`, `SUS_BURST`, `SUS_MAX_CONNECTIONS_PER_ROUTE`, `SUS_BLOCK_ON_LIMIT`
    /// - `SUS_TIMEOUT_MS`, `SUS_CONNECT_TIMEOUT_MS`
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::new();

        if let Ok(endpoint) = env::var("SUS_ENDPOINT") {
            cfg.endpoint = endpoint;
        }
        if let Some(token) = Self::resolve_access_token() {
            cfg.access_token = token;
        }
        if let Ok(ua) = env::var("SUS_USER_AGENT") {
            cfg.user_agent = ua;
        }
        if let Some(rps) = parse_env::<f64>("SUS_RPS")? {
            cfg.requests_per_second = rps;
        }
        if let Some(burst) = parse_env::<u32>("SUS_BURST")? {
            cfg.burst_size = burst;
        }
        if let Some(n) = parse_env::<usize>("SUS_MAX_CONNECTIONS_PER_ROUTE")? {
            cfg.max_connections_per_route = n;
        }
        if let Some(block) = parse_env::<bool>("SUS_BLOCK_ON_LIMIT")? {
            cfg.block_till_rate_limit_reset = block;
        }
        if let Some(ms) = parse_env::<u64>("SUS_TIMEOUT_MS")? {
            cfg.timeout_ms = Some(ms).filter(|ms| *ms > 0);
        }
        if let Some(ms) = parse_env::<u64>("SUS_CONNECT_TIMEOUT_MS")? {
            cfg.connect_timeout_ms = Some(ms).filter(|ms| *ms > 0);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid configuration document: {}", e),
                ErrorContext::new().with_source("configuration"),
            )
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read configuration file: {}", e),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("configuration"),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    fn resolve_access_token() -> Option<String> {
        // 1. Environment variable
        if let Ok(token) = env::var("SUS_ACCESS_TOKEN") {
            if !token.is_empty() {
                return Some(token);
            }
        }

        // 2. OS keyring
        Entry::new(KEYRING_SERVICE, KEYRING_USER)
            .ok()
            .and_then(|entry| entry.get_password().ok())
    }

    /// Parse the endpoint as an absolute base URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            Error::configuration_with_context(
                format!("endpoint is not a valid URL: {}", e),
                ErrorContext::new()
                    .with_field_path("endpoint")
                    .with_details(self.endpoint.clone())
                    .with_source("configuration"),
            )
        })?;
        if url.cannot_be_a_base() {
            return Err(Error::configuration_with_context(
                "endpoint cannot be used as a base URL",
                ErrorContext::new()
                    .with_field_path("endpoint")
                    .with_details(self.endpoint.clone())
                    .with_source("configuration"),
            ));
        }
        Ok(url)
    }

    pub fn validate(&self) -> Result<()> {
        self.endpoint_url()?;

        if !self.requests_per_second.is_finite() || self.requests_per_second < 0.0 {
            return Err(invalid(
                "requests_per_second",
                "requests per second must be a finite, non-negative number",
                self.requests_per_second.to_string(),
            ));
        }
        if self.burst_size == 0 {
            return Err(invalid(
                "burst_size",
                "burst size must be at least 1",
                self.burst_size.to_string(),
            ));
        }
        if self.max_connections_per_route == 0 {
            return Err(invalid(
                "max_connections_per_route",
                "max connections per route must be at least 1",
                self.max_connections_per_route.to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(field: &str, message: &str, actual: String) -> Error {
    Error::configuration_with_context(
        message,
        ErrorContext::new()
            .with_field_path(field)
            .with_details(format!("got {}", actual))
            .with_source("configuration"),
    )
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            Error::configuration_with_context(
                format!("cannot parse environment variable {}", name),
                ErrorContext::new()
                    .with_field_path(name)
                    .with_details(raw.clone())
                    .with_source("environment"),
            )
        }),
        Err(_) => Ok(None),
    }
}
