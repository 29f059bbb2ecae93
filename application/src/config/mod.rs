//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ConsensusParams`]: request construction, strategy and escalation
//! - [`CacheParams`]: TTL and key derivation for the consensus cache

pub mod cache_params;
pub mod consensus_params;

pub use cache_params::CacheParams;
pub use consensus_params::{ConsensusParams, DEFAULT_SYSTEM_PROMPT};
