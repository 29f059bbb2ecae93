//! Cache parameters.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CacheParams {
    /// How long a consensus stays valid.
    pub ttl: Duration,
    /// Bytes of the normalized question that feed the cache key.
    pub key_prefix_bytes: usize,
    /// Interval of the background expiry sweep; `None` relies on lazy expiry.
    pub sweep_interval: Option<Duration>,
}

impl Default for CacheParams {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            key_prefix_bytes: 512,
            sweep_interval: None,
        }
    }
}

impl CacheParams {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_key_prefix_bytes(mut self, bytes: usize) -> Self {
        self.key_prefix_bytes = bytes;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Option<Duration>) -> Self {
        self.sweep_interval = interval;
        self
    }
}
