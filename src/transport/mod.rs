//! HTTP transport: the pooled connection layer shared by all calls of a client.

pub mod http;

pub use http::{HttpTransport, RawResponse, TransportError};
