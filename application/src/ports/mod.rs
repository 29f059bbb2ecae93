//! Ports: interfaces the application layer depends on.
//!
//! Implementations live in the infrastructure and presentation layers.

pub mod clock;
pub mod progress;
pub mod provider_adapter;
pub mod usage;
