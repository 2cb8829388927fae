use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use serde::Serialize;
use tracing::debug;

/// Longest single sleep; the bucket is re-checked after each one.
const MAX_WAIT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize)]
pub struct RateLimiterSnapshot {
    pub rps: f64,
    pub burst: f64,
    pub tokens: f64,
    /// Estimated wait time until a token is available (ms), if currently empty.
    pub estimated_wait_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Tokens per second.
    pub rps: f64,
    /// Maximum burst size (tokens).
    pub burst: f64,
}

impl RateLimiterConfig {
    pub fn from_rps(rps: f64) -> Option<Self> {
        if !rps.is_finite() || rps < 0.0 {
            return None;
        }
        Some(Self {
            rps,
            burst: rps.max(1.0), // default burst: 1 second worth, at least 1
        })
    }

    /// Rate and bucket capacity taken from the client configuration.
    pub fn from_configuration(cfg: &crate::Configuration) -> Self {
        Self {
            rps: cfg.requests_per_second,
            burst: f64::from(cfg.burst_size.max(1)),
        }
    }

    /// Create a new config with default values
    pub fn new() -> Self {
        Self {
            rps: 10.0,
            burst: 10.0,
        }
    }

    /// Set the maximum tokens (burst size)
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.burst = tokens as f64;
        self
    }

    /// Set the refill rate (tokens per second)
    pub fn with_refill_rate(mut self, rate: f64) -> Self {
        self.rps = rate;
        self
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct State {
    tokens: f64,
    last: Instant,
}

/// Token-bucket rate limiter shared by every call of one client.
///
/// - Starts full (`burst` tokens) and refills continuously at `rps` tokens per second
/// - `rps <= 0` disables limiting
/// - No fairness beyond the mutex: a waiter may lose the refilled token to a newcomer
#[derive(Debug)]
pub struct RateLimiter {
    cfg: RateLimiterConfig,
    state: Mutex<State>,
}

impl RateLimiter {
    pub fn new(cfg: RateLimiterConfig) -> Self {
        let burst = cfg.burst;
        let state = Mutex::new(State {
            tokens: burst,
            last: Instant::now(),
        });
        Self { cfg, state }
    }

    fn refill_locked(cfg: &RateLimiterConfig, st: &mut State) {
        let now = Instant::now();
        let elapsed = now.duration_since(st.last).as_secs_f64();
        if elapsed > 0.0 {
            st.tokens = (st.tokens + elapsed * cfg.rps).min(cfg.burst);
            st.last = now;
        }
    }

    /// Acquire one token, waiting for the bucket to refill if it is empty.
    ///
    /// Token accounting happens under the lock; the wait does not hold it.
    pub async fn acquire(&self) {
        let cfg = &self.cfg;
        if cfg.rps <= 0.0 {
            return;
        }

        loop {
            let wait_duration = {
                let mut st = self.state.lock().await;
                Self::refill_locked(cfg, &mut st);

                if st.tokens >= 1.0 {
                    st.tokens -= 1.0;
                    return;
                }

                refill_wait(1.0 - st.tokens, cfg.rps)
            };

            debug!(
                wait_ms = wait_duration.as_millis() as u64,
                "rate limit reached, waiting for refill"
            );
            tokio::time::sleep(wait_duration).await;
        }
    }

    /// Try to acquire a token without waiting, returns true if successful
    pub async fn try_acquire(&self) -> bool {
        let cfg = &self.cfg;
        if cfg.rps <= 0.0 {
            return true;
        }

        let mut st = self.state.lock().await;
        Self::refill_locked(cfg, &mut st);

        if st.tokens >= 1.0 {
            st.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    pub async fn snapshot(&self) -> RateLimiterSnapshot {
        let cfg = &self.cfg;
        let mut st = self.state.lock().await;

        let mut wait_ms = None;
        if cfg.rps > 0.0 {
            Self::refill_locked(cfg, &mut st);
            if st.tokens < 1.0 {
                let missing = 1.0 - st.tokens;
                wait_ms = Some((missing / cfg.rps * 1000.0) as u64);
            }
        }

        RateLimiterSnapshot {
            rps: cfg.rps,
            burst: cfg.burst,
            tokens: st.tokens,
            estimated_wait_ms: wait_ms,
        }
    }
}

/// Time for `missing` tokens to refill at `rps`, capped at [`MAX_WAIT`].
///
/// Very small rates produce waits `Duration` cannot represent.
fn refill_wait(missing: f64, rps: f64) -> Duration {
    Duration::try_from_secs_f64(missing / rps)
        .map(|wait| wait.min(MAX_WAIT))
        .unwrap_or(MAX_WAIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_rate_limiter_config_from_rps() {
        let config = RateLimiterConfig::from_rps(10.0).unwrap();
        assert_eq!(config.rps, 10.0);
        assert_eq!(config.burst, 10.0);
    }

    #[test]
    fn test_rate_limiter_config_from_rps_low() {
        let config = RateLimiterConfig::from_rps(0.5).unwrap();
        assert_eq!(config.rps, 0.5);
        // burst should be at least 1.0
        assert_eq!(config.burst, 1.0);
    }

    #[test]
    fn test_rate_limiter_config_from_rps_invalid() {
        assert!(RateLimiterConfig::from_rps(-1.0).is_none());
        assert!(RateLimiterConfig::from_rps(f64::NAN).is_none());
        assert!(RateLimiterConfig::from_rps(f64::INFINITY).is_none());
    }

    #[test]
    fn test_rate_limiter_config_from_configuration() {
        let cfg = crate::Configuration::new()
            .with_requests_per_second(2.0)
            .with_burst_size(5);
        let config = RateLimiterConfig::from_configuration(&cfg);
        assert_eq!(config.rps, 2.0);
        assert_eq!(config.burst, 5.0);
    }

    #[tokio::test]
    async fn test_rate_limiter_initial_burst() {
        let config = RateLimiterConfig::from_rps(10.0).unwrap();
        let limiter = RateLimiter::new(config);

        let snapshot = limiter.snapshot().await;
        assert_eq!(snapshot.burst, 10.0);
        assert!(snapshot.tokens >= 9.0);
        assert!(snapshot.estimated_wait_ms.is_none());
    }

    #[tokio::test]
    async fn test_rate_limiter_try_acquire() {
        let config = RateLimiterConfig::new()
            .with_max_tokens(3)
            .with_refill_rate(1.0);
        let limiter = RateLimiter::new(config);

        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);

        // Fourth should fail (no tokens left)
        assert!(!limiter.try_acquire().await);
        assert!(limiter.snapshot().await.estimated_wait_ms.is_some());
    }

    #[tokio::test]
    async fn test_rate_limiter_zero_rps() {
        let config = RateLimiterConfig::new()
            .with_max_tokens(1)
            .with_refill_rate(0.0);
        let limiter = RateLimiter::new(config);

        // Zero RPS means unlimited
        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert!(limiter.try_acquire().await);
    }

    #[tokio::test]
    async fn test_rate_limiter_refill() {
        let config = RateLimiterConfig::new()
            .with_max_tokens(5)
            .with_refill_rate(100.0); // 100 tokens/sec = 1 token/10ms
        let limiter = RateLimiter::new(config);

        for _ in 0..5 {
            assert!(limiter.try_acquire().await);
        }
        assert!(!limiter.try_acquire().await);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(limiter.try_acquire().await);
    }

    #[tokio::test]
    async fn test_rate_limiter_refill_caps_at_burst() {
        let config = RateLimiterConfig::new()
            .with_max_tokens(2)
            .with_refill_rate(1000.0);
        let limiter = RateLimiter::new(config);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let snapshot = limiter.snapshot().await;
        assert!(snapshot.tokens <= 2.0);
    }

    #[test]
    fn test_refill_wait_is_capped() {
        assert_eq!(refill_wait(1.0, 2.0), Duration::from_millis(500));
        assert_eq!(refill_wait(1.0, 1e-20), MAX_WAIT);
        assert_eq!(refill_wait(1.0, f64::MIN_POSITIVE), MAX_WAIT);
        assert_eq!(refill_wait(0.5, 1e-3), MAX_WAIT);
    }

    #[tokio::test]
    async fn test_tiny_rate_waits_instead_of_panicking() {
        let cfg = crate::Configuration::new()
            .with_requests_per_second(1e-20)
            .with_burst_size(1);
        cfg.validate().unwrap();
        let limiter = Arc::new(RateLimiter::new(RateLimiterConfig::from_configuration(&cfg)));

        limiter.acquire().await;
        let waiter = {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.acquire().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        waiter.abort();
        let err = waiter.await.unwrap_err();
        assert!(err.is_cancelled(), "{:?}", err);
        assert!(limiter.snapshot().await.estimated_wait_ms.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_then_block() {
        // 3 tokens, 4 concurrent callers: three pass at once, the fourth waits ~100ms.
        let config = RateLimiterConfig::new()
            .with_max_tokens(3)
            .with_refill_rate(10.0);
        let limiter = Arc::new(RateLimiter::new(config));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    limiter.acquire().await;
                    start.elapsed()
                })
            })
            .collect();

        let mut elapsed = Vec::new();
        for h in handles {
            elapsed.push(h.await.unwrap());
        }
        elapsed.sort();

        for fast in &elapsed[..3] {
            assert!(*fast < Duration::from_millis(50), "{:?}", fast);
        }
        assert!(elapsed[3] >= Duration::from_millis(90), "{:?}", elapsed[3]);
    }
}
