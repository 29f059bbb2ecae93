//! In-memory usage aggregation

use crate::ports::usage::{UsageEvent, UsageObserver};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Totals for one `provider/model`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderUsage {
    pub calls: u64,
    pub successes: u64,
    pub failures: u64,
    pub total_elapsed_ms: u64,
    pub estimated_cost: f64,
}

impl ProviderUsage {
    pub fn average_elapsed_ms(&self) -> u64 {
        if self.calls == 0 {
            0
        } else {
            self.total_elapsed_ms / self.calls
        }
    }
}

/// Point-in-time view of everything recorded so far
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSnapshot {
    pub since: DateTime<Utc>,
    pub providers: BTreeMap<String, ProviderUsage>,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub consensus_count: u64,
    pub mean_agreement: f64,
    pub total_estimated_cost: f64,
}

#[derive(Debug, Default)]
struct Totals {
    providers: BTreeMap<String, ProviderUsage>,
    cache_hits: u64,
    cache_misses: u64,
    consensus_count: u64,
    agreement_sum: f64,
}

/// Aggregates usage events; cheap enough to keep for the whole process.
#[derive(Debug)]
pub struct UsageTracker {
    since: DateTime<Utc>,
    totals: Mutex<Totals>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self {
            since: Utc::now(),
            totals: Mutex::new(Totals::default()),
        }
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        let totals = self.totals.lock().unwrap_or_else(|e| e.into_inner());
        UsageSnapshot {
            since: self.since,
            providers: totals.providers.clone(),
            cache_hits: totals.cache_hits,
            cache_misses: totals.cache_misses,
            consensus_count: totals.consensus_count,
            mean_agreement: if totals.consensus_count == 0 {
                0.0
            } else {
                totals.agreement_sum / totals.consensus_count as f64
            },
            total_estimated_cost: totals.providers.values().map(|p| p.estimated_cost).sum(),
        }
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageObserver for UsageTracker {
    fn record(&self, event: &UsageEvent) {
        let mut totals = self.totals.lock().unwrap_or_else(|e| e.into_inner());
        match event {
            UsageEvent::ProviderCall {
                provider_id,
                model_id,
                success,
                elapsed_ms,
                estimated_cost,
            } => {
                let usage = totals
                    .providers
                    .entry(format!("{}/{}", provider_id, model_id))
                    .or_default();
                usage.calls += 1;
                if *success {
                    usage.successes += 1;
                } else {
                    usage.failures += 1;
                }
                usage.total_elapsed_ms += elapsed_ms;
                usage.estimated_cost += estimated_cost;
            }
            UsageEvent::CacheHit { .. } => totals.cache_hits += 1,
            UsageEvent::CacheMiss { .. } => totals.cache_misses += 1,
            UsageEvent::ConsensusReached {
                agreement_ratio, ..
            } => {
                totals.consensus_count += 1;
                totals.agreement_sum += agreement_ratio;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(model: &str, success: bool, elapsed_ms: u64, cost: f64) -> UsageEvent {
        UsageEvent::ProviderCall {
            provider_id: "openai".into(),
            model_id: model.into(),
            success,
            elapsed_ms,
            estimated_cost: cost,
        }
    }

    #[test]
    fn test_aggregates_per_provider() {
        let tracker = UsageTracker::new();
        tracker.record(&call("gpt-5", true, 100, 1.5));
        tracker.record(&call("gpt-5", false, 300, 0.5));
        tracker.record(&call("gpt-4.1", true, 50, 1.0));

        let snapshot = tracker.snapshot();
        let gpt5 = &snapshot.providers["openai/gpt-5"];
        assert_eq!(gpt5.calls, 2);
        assert_eq!(gpt5.successes, 1);
        assert_eq!(gpt5.failures, 1);
        assert_eq!(gpt5.average_elapsed_ms(), 200);
        assert_eq!(snapshot.total_estimated_cost, 3.0);
    }

    #[test]
    fn test_cache_and_consensus_counters() {
        let tracker = UsageTracker::new();
        tracker.record(&UsageEvent::CacheHit { key: "a".into() });
        tracker.record(&UsageEvent::CacheMiss { key: "b".into() });
        tracker.record(&UsageEvent::CacheMiss { key: "c".into() });
        for ratio in [1.0, 0.5] {
            tracker.record(&UsageEvent::ConsensusReached {
                strategy: None,
                agreement_ratio: ratio,
                success_count: 1,
                participant_count: 1,
            });
        }

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 2);
        assert_eq!(snapshot.consensus_count, 2);
        assert_eq!(snapshot.mean_agreement, 0.75);
    }
}
