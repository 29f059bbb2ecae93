//! Consensus cache and its key derivation

pub mod consensus_cache;
pub mod key;

pub use consensus_cache::{CacheStats, ConsensusCache};
pub use key::cache_key;
