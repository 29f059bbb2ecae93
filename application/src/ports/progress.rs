//! Progress notification port
//!
//! Defines the interface for reporting progress while a request is fanned
//! out to the providers of a profile.

use quorum_domain::CallResult;

/// Callback for progress updates during a consensus call
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinners, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once the participating providers are known
    fn on_dispatch_start(&self, profile: &str, total: usize);

    /// Called as each provider finishes, in completion order
    fn on_provider_complete(&self, result: &CallResult);

    /// Called after every provider has finished
    fn on_dispatch_complete(&self, succeeded: usize, total: usize);

    /// Called when a cheap result is retried on a premium profile
    fn on_escalation(&self, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_dispatch_start(&self, _profile: &str, _total: usize) {}
    fn on_provider_complete(&self, _result: &CallResult) {}
    fn on_dispatch_complete(&self, _succeeded: usize, _total: usize) {}
}
