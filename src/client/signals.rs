use crate::resilience::rate_limiter::RateLimiterSnapshot;
use serde::Serialize;

/// Usage of a client's shared resources at one instant: connection permits
/// and the rate limiter bucket.
///
/// `sus-cli status` prints it as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct SignalsSnapshot {
    pub endpoint: String,
    pub connections: ConnectionSnapshot,
    /// `None` when blocking on the rate limit is disabled.
    pub rate_limiter: Option<RateLimiterSnapshot>,
}

/// Exchanges in flight against `max_connections_per_route` permits.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSnapshot {
    pub max: usize,
    pub available: usize,
    pub in_use: usize,
}

impl ConnectionSnapshot {
    pub fn new(max: usize, available: usize) -> Self {
        Self {
            max,
            available,
            in_use: max.saturating_sub(available),
        }
    }

    /// True when the next call has to wait for a connection permit.
    pub fn is_exhausted(&self) -> bool {
        self.available == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_snapshot_counts() {
        let snapshot = ConnectionSnapshot::new(4, 1);
        assert_eq!(snapshot.in_use, 3);
        assert!(!snapshot.is_exhausted());
        assert!(ConnectionSnapshot::new(2, 0).is_exhausted());
    }

    #[test]
    fn test_signals_serialize() {
        let signals = SignalsSnapshot {
            endpoint: "https://www.stuffusell.co.uk/".to_string(),
            connections: ConnectionSnapshot::new(20, 20),
            rate_limiter: None,
        };
        let value = serde_json::to_value(&signals).unwrap();
        assert_eq!(value["connections"]["in_use"], 0);
        assert!(value["rate_limiter"].is_null());
    }
}
