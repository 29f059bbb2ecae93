//! Provider descriptors and profiles.
//!
//! A [`ProviderDescriptor`] names one backend/model pair together with its
//! cost and latency class. A [`Profile`] is a named, ordered list of
//! descriptors that are consulted together for a single logical request.
//!
//! ```text
//! ProfileCatalog ──name──▶ Profile ──[descriptor, descriptor, ...]
//!                                       │
//!                                       └─ ProviderFamily ──▶ adapter (registry)
//! ```

pub mod descriptor;
pub mod profile;

pub use descriptor::{CostClass, LatencyClass, ProviderDescriptor, ProviderFamily};
pub use profile::{Profile, ProfileCatalog, ProfileRef};
