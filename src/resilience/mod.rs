//! 限流模块：出站请求的令牌桶准入控制。
//!
//! # Resilience Primitives Module
//!
//! Admission control for outbound calls. The executor asks the limiter for a
//! token before every request (unless blocking on the limit is disabled in the
//! configuration), which bounds the average request rate while still allowing
//! short bursts.
//!
//! ```rust
//! use stuffusell_client::resilience::rate_limiter::{RateLimiter, RateLimiterConfig};
//!
//! # async fn demo() {
//! let config = RateLimiterConfig::new()
//!     .with_max_tokens(2)
//!     .with_refill_rate(2.0); // 2 tokens per second
//! let limiter = RateLimiter::new(config);
//!
//! limiter.acquire().await; // immediate
//! limiter.acquire().await; // immediate
//! limiter.acquire().await; // waits ~500ms
//! # }
//! ```

pub mod rate_limiter;
