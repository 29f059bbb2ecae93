//! Usage observation port
//!
//! Usage events describe what a consensus call cost and whether the cache
//! helped. Observers are passive: recording must never fail or block the
//! call that produced the event.

use quorum_domain::{CostClass, StrategyKind};
use serde::Serialize;
use std::sync::Arc;

/// Something worth accounting for
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UsageEvent {
    ProviderCall {
        provider_id: String,
        model_id: String,
        success: bool,
        elapsed_ms: u64,
        /// Relative cost units, see [`estimate_cost`]
        estimated_cost: f64,
    },
    CacheHit {
        key: String,
    },
    CacheMiss {
        key: String,
    },
    ConsensusReached {
        strategy: Option<StrategyKind>,
        agreement_ratio: f64,
        success_count: usize,
        participant_count: usize,
    },
}

impl UsageEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            UsageEvent::ProviderCall { .. } => "provider_call",
            UsageEvent::CacheHit { .. } => "cache_hit",
            UsageEvent::CacheMiss { .. } => "cache_miss",
            UsageEvent::ConsensusReached { .. } => "consensus_reached",
        }
    }
}

/// Relative cost of a call moving `chars` characters through a model of
/// the given cost class.
pub fn estimate_cost(cost_class: CostClass, chars: usize) -> f64 {
    cost_class.rate_per_kchar() * chars as f64 / 1000.0
}

/// Receives usage events
pub trait UsageObserver: Send + Sync {
    fn record(&self, event: &UsageEvent);
}

/// Discards every event
pub struct NoUsage;

impl UsageObserver for NoUsage {
    fn record(&self, _event: &UsageEvent) {}
}

/// Forwards every event to several observers
#[derive(Default)]
pub struct UsageFanout {
    observers: Vec<Arc<dyn UsageObserver>>,
}

impl UsageFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn UsageObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl UsageObserver for UsageFanout {
    fn record(&self, event: &UsageEvent) {
        for observer in &self.observers {
            observer.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<&'static str>>);

    impl UsageObserver for Recorder {
        fn record(&self, event: &UsageEvent) {
            self.0.lock().unwrap().push(event.kind());
        }
    }

    #[test]
    fn test_estimate_cost() {
        assert_eq!(estimate_cost(CostClass::Low, 2000), 2.0);
        assert_eq!(estimate_cost(CostClass::Medium, 500), 2.0);
        assert_eq!(estimate_cost(CostClass::High, 1000), 15.0);
    }

    #[test]
    fn test_fanout_reaches_every_observer() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let fanout = UsageFanout::new().with(a.clone()).with(b.clone());
        fanout.record(&UsageEvent::CacheHit { key: "k".into() });
        assert_eq!(*a.0.lock().unwrap(), vec!["cache_hit"]);
        assert_eq!(*b.0.lock().unwrap(), vec!["cache_hit"]);
    }

    #[test]
    fn test_event_serialization_tag() {
        let json = serde_json::to_value(UsageEvent::CacheMiss { key: "k".into() }).unwrap();
        assert_eq!(json["event"], "cache_miss");
        assert_eq!(json["key"], "k");
    }
}
