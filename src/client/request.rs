//! Outbound request description, built fresh for every call.

use crate::{Error, ErrorContext, Result};
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Query parameters in insertion order; keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing the value in place if the key is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: QueryParams,
    /// Serialized JSON body (POST only).
    pub body: Option<String>,
}

impl OutboundRequest {
    pub fn get(path: impl Into<String>, query: QueryParams) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query,
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>, query: QueryParams) -> Self {
        Self {
            method: HttpMethod::Delete,
            path: path.into(),
            query,
            body: None,
        }
    }

    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, payload: &B) -> Result<Self> {
        let body = serde_json::to_string(payload)?;
        Ok(Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: QueryParams::new(),
            body: Some(body),
        })
    }

    /// Absolute URL: `base` + path (each segment percent-encoded) + query string.
    pub fn resolve_url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::configuration_with_context(
                    "endpoint cannot be used as a base URL",
                    ErrorContext::new()
                        .with_details(base.to_string())
                        .with_source("request_builder"),
                )
            })?;
            segments
                .pop_if_empty()
                .extend(self.path.split('/').filter(|s| !s.is_empty()));
        }

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.example.com").unwrap()
    }

    #[test]
    fn test_query_params_keep_order_and_replace() {
        let mut params = QueryParams::new().with("page", 1).with("pageSize", 20);
        params.insert("page", 3);
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("page", "3"), ("pageSize", "20")]);
        assert_eq!(params.get("pageSize"), Some("20"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_resolve_url_without_query() {
        let req = OutboundRequest::get("/api/customer/categories", QueryParams::new());
        assert_eq!(
            req.resolve_url(&base()).unwrap().as_str(),
            "https://api.example.com/api/customer/categories"
        );
    }

    #[test]
    fn test_resolve_url_encodes_query() {
        let req = OutboundRequest::get(
            "/api/customer/username-available",
            QueryParams::new().with("username", "a b&c"),
        );
        assert_eq!(
            req.resolve_url(&base()).unwrap().as_str(),
            "https://api.example.com/api/customer/username-available?username=a+b%26c"
        );
    }

    #[test]
    fn test_resolve_url_keeps_base_path() {
        let base = Url::parse("https://api.example.com/sus/").unwrap();
        let req = OutboundRequest::delete("api/sku/ABC 1", QueryParams::new());
        assert_eq!(
            req.resolve_url(&base).unwrap().as_str(),
            "https://api.example.com/sus/api/sku/ABC%201"
        );
    }

    #[test]
    fn test_post_serializes_payload() {
        let req = OutboundRequest::post("/api/customer/register", &serde_json::json!({"username": "a"}))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some(r#"{"username":"a"}"#));
    }
}
