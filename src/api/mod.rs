//! Endpoint methods of the customer API.
//!
//! Every method maps to one path and verb and delegates to the [`HttpClient`]
//! executor. Each takes the caller's [`CallContext`](crate::CallContext) (auth token, end-user IP
//! address, user agent) explicitly, so nothing leaks between concurrent callers.
//! Methods acting for a signed-in customer need a context carrying that
//! customer's auth token (see [`CallContext::basic`](crate::CallContext::basic)).
//!
//! A success response without a body yields `Ok(None)`.

mod customer;
mod orders;

use crate::client::HttpClient;
use crate::{Configuration, Result};

/// Entry point for the customer API.
#[derive(Debug, Clone)]
pub struct SusClient {
    http: HttpClient,
}

impl SusClient {
    pub fn new(configuration: Configuration) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(configuration)?,
        })
    }

    /// Client with default configuration and the given access token.
    pub fn with_access_token(access_token: impl Into<String>) -> Result<Self> {
        Self::new(Configuration::new().with_access_token(access_token))
    }

    pub fn from_http_client(http: HttpClient) -> Self {
        Self { http }
    }

    /// The underlying executor, for calls this client has no method for.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

/// Empty JSON object, the body of POSTs that carry no data.
fn empty_body() -> serde_json::Map<String, serde_json::Value> {
    serde_json::Map::new()
}
