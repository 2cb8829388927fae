//! # stuffusell-client
//!
//! Rust client for the StuffUSell customer API.
//!
//! ## Overview
//!
//! Every remote call goes through one request executor ([`HttpClient`]) which:
//!
//! - resolves the URL from the configured endpoint, the path and the query parameters
//! - waits for admission from a token-bucket [`RateLimiter`](resilience::rate_limiter::RateLimiter)
//! - attaches the access token, user agent and (when the call has one) the caller's identity
//! - executes the exchange over one pooled transport shared by all callers
//! - decodes the JSON body, or classifies the failure into a typed [`Error`]
//!
//! Identity is a [`CallContext`] value passed explicitly to every call. Callers
//! that run one call per thread can use the thread-scoped helpers in [`context`]
//! together with the [`blocking`] clients instead.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stuffusell_client::{CallContext, Configuration, ErrorKind, SusClient};
//!
//! #[tokio::main]
//! async fn main() -> stuffusell_client::Result<()> {
//!     let client = SusClient::new(Configuration::from_env()?)?;
//!
//!     let login = client
//!         .login(&CallContext::new(), "alice@example.com", "secret")
//!         .await?;
//!     let ctx = CallContext::new().with_auth_token(login.auth_token);
//!     match client.orders(&ctx).await {
//!         Ok(orders) => println!("{} orders", orders.map_or(0, |o| o.len())),
//!         Err(e) if e.kind() == ErrorKind::Unauthorized => println!("log in again"),
//!         Err(e) => return Err(e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Endpoint methods ([`SusClient`]) |
//! | [`client`] | Request executor, outbound requests, failure classification |
//! | [`context`] | Per-call identity, explicit and thread-scoped |
//! | [`resilience`] | Rate limiting |
//! | [`transport`] | Pooled HTTP transport |
//! | [`types`] | Request and response records |
//! | [`blocking`] | Thread-blocking executor and endpoint methods |
//! | [`config`] | Client configuration |

pub mod api;
pub mod blocking;
pub mod client;
pub mod config;
pub mod context;
pub mod resilience;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use api::SusClient;
pub use client::{HttpClient, OutboundRequest, QueryParams};
pub use config::Configuration;
pub use context::CallContext;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind, ErrorResponse};
