//! Tier selection: which profile should serve a request

pub mod complexity;
pub mod selector;

pub use complexity::{Complexity, ComplexityEstimate, estimate_complexity};
pub use selector::{Tier, TierDecision, TierSelector};
