//! Logging infrastructure: structured usage logging.
//!
//! Provides [`JsonlUsageLogger`], a JSONL file writer that implements
//! the [`UsageObserver`](quorum_application::UsageObserver) port.

mod jsonl_usage;

pub use jsonl_usage::JsonlUsageLogger;
