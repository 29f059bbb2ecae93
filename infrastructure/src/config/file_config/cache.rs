//! Cache configuration from TOML (`[cache]` section)

use quorum_application::CacheParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
    /// Bytes of the normalized question hashed into the key
    pub key_prefix_bytes: usize,
    /// Background purge period in seconds (0 disables the sweeper)
    pub sweep_interval_secs: u64,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        let params = CacheParams::default();
        Self {
            ttl_secs: params.ttl.as_secs(),
            key_prefix_bytes: params.key_prefix_bytes,
            sweep_interval_secs: 300,
        }
    }
}

impl FileCacheConfig {
    pub fn to_params(&self) -> CacheParams {
        let sweep = (self.sweep_interval_secs > 0)
            .then(|| Duration::from_secs(self.sweep_interval_secs));
        CacheParams::default()
            .with_ttl(Duration::from_secs(self.ttl_secs))
            .with_key_prefix_bytes(self.key_prefix_bytes)
            .with_sweep_interval(sweep)
    }
}
