//! Consensus domain
//!
//! Everything needed to turn several provider responses into one answer:
//!
//! - [`CallResult`]: what one provider returned
//! - [`strategy`]: the reconciliation strategies
//! - [`ConsensusResult`]: the agreed answer plus how it was reached
//! - [`QuorumRule`] / [`EscalationPolicy`]: whether a cheap answer is trustworthy
//!
//! ```text
//! profile ──► CallResult × N ──► successes ──► strategy ──► ConsensusResult
//!                                    │                           │
//!                                    └── exactly one ────────────┘
//! ```

pub mod call_result;
pub mod consensus;
pub mod escalation;
pub mod rule;
pub mod strategy;

pub use call_result::{CallOutcome, CallResult, CallStatus};
pub use consensus::{ConsensusResult, SINGLE_SURVIVOR_EXPLANATION};
pub use escalation::EscalationPolicy;
pub use rule::QuorumRule;
pub use strategy::{Ballot, ConsensusStrategy, RankEntry, StrategyKind, StrategyOutcome};
