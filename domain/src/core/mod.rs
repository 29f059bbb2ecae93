//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`]: a validated question posed to a profile
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod question;
