//! Use cases: application-level operations built on the ports.

pub mod cached_consensus;
pub mod run_consensus;
