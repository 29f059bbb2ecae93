//! Domain layer for consensus-quorum
//!
//! This crate contains the core types and algorithms of the consensus engine.
//! It performs no I/O and has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Profile
//!
//! A named, ordered list of provider/model pairs that answer one request
//! together. See [`ProfileCatalog`] for the built-in set.
//!
//! ## Consensus
//!
//! The surviving structured responses of a profile are reconciled into one
//! [`ConsensusResult`] by a [`ConsensusStrategy`].
//!
//! ## Tier
//!
//! [`TierSelector`] routes a request to a cheap, balanced or expensive
//! profile based on its complexity and task type.

pub mod config;
pub mod core;
pub mod providers;
pub mod quorum;
pub mod request;
pub mod tier;
pub mod util;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{error::DomainError, question::Question};
pub use providers::{
    CostClass, LatencyClass, Profile, ProfileCatalog, ProfileRef, ProviderDescriptor,
    ProviderFamily,
};
pub use quorum::{
    Ballot, CallOutcome, CallResult, CallStatus, ConsensusResult, ConsensusStrategy,
    EscalationPolicy, QuorumRule, RankEntry, StrategyKind, StrategyOutcome,
};
pub use request::{CallRequest, FieldType, OutputSchema, SchemaField, SchemaViolation};
pub use tier::{Complexity, Tier, TierDecision, TierSelector};
