//! In-memory consensus cache
//!
//! Entries live in a sharded [`DashMap`], so concurrent callers need no
//! external locking. Time comes from an injected [`Clock`]; expired entries
//! are dropped lazily on lookup, by [`ConsensusCache::purge_expired`], or by
//! the optional background sweeper.

use crate::ports::clock::{Clock, SystemClock};
use dashmap::DashMap;
use quorum_domain::ConsensusResult;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct CacheEntry {
    result: Arc<ConsensusResult>,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.ttl
    }
}

/// Counters since the cache was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped because they expired
    pub evictions: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

pub struct ConsensusCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl ConsensusCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh entry for `key`, dropping it if it has expired.
    pub fn get(&self, key: &str) -> Option<Arc<ConsensusResult>> {
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(Arc::clone(&entry.result));
            }
        }

        // The read guard above is released before touching the shard again
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            debug!("Cache entry expired: {}", key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a result with the cache's TTL, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, result: ConsensusResult) -> Arc<ConsensusResult> {
        let result = Arc::new(result);
        self.entries.insert(
            key.into(),
            CacheEntry {
                result: Arc::clone(&result),
                created_at: self.clock.now(),
                ttl: self.ttl,
            },
        );
        result
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry; returns how many were removed.
    pub fn clear(&self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    /// Periodically purge expired entries until `shutdown` fires.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    biased;

                    _ = shutdown.cancelled() => {
                        debug!("cache sweeper received shutdown signal");
                        break;
                    }

                    _ = ticker.tick() => {
                        let removed = cache.purge_expired();
                        if removed > 0 {
                            debug!(removed, remaining = cache.len(), "cache sweep");
                        }
                    }
                }
            }

            info!("Cache sweeper shutdown complete");
        })
    }
}
