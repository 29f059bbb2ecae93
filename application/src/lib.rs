//! Application layer for consensus-quorum
//!
//! This crate contains use cases, port definitions, the consensus cache and
//! application configuration. It depends only on the domain layer.

pub mod cache;
pub mod config;
pub mod ports;
pub mod registry;
pub mod tracker;
pub mod use_cases;

// Re-export commonly used types
pub use cache::{CacheStats, ConsensusCache, cache_key};
pub use config::{CacheParams, ConsensusParams};
pub use ports::{
    clock::{Clock, ManualClock, SystemClock},
    progress::{NoProgress, ProgressNotifier},
    provider_adapter::{ProviderAdapter, ProviderError},
    usage::{NoUsage, UsageEvent, UsageFanout, UsageObserver, estimate_cost},
};
pub use registry::AdapterRegistry;
pub use tracker::{ProviderUsage, UsageSnapshot, UsageTracker};
pub use use_cases::cached_consensus::{
    CachedConsensusUseCase, ConsensusAnswer, ConsensusQuery, QuestionItem,
};
pub use use_cases::run_consensus::{AdaptiveOutcome, RunConsensusError, RunConsensusUseCase};
