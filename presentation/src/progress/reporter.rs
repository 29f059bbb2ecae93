//! Progress reporting for consensus dispatch

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use quorum_application::ports::progress::ProgressNotifier;
use quorum_domain::CallResult;
use std::sync::Mutex;

/// Reports progress during a dispatch with an indicatif bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn dispatch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn provider_line(result: &CallResult) -> String {
        if result.is_success() {
            format!(
                "{} {} ({}ms)",
                "v".green(),
                result.source(),
                result.elapsed_ms
            )
        } else {
            format!(
                "{} {} ({})",
                "x".red(),
                result.source(),
                result.error_detail().unwrap_or("failed")
            )
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_dispatch_start(&self, profile: &str, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::dispatch_style());
        pb.set_prefix(format!("profile {}", profile));
        pb.set_message("waiting for providers...");
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_provider_complete(&self, result: &CallResult) {
        if let Ok(slot) = self.bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(Self::provider_line(result));
            pb.inc(1);
        }
    }

    fn on_dispatch_complete(&self, succeeded: usize, total: usize) {
        if let Ok(mut slot) = self.bar.lock()
            && let Some(pb) = slot.take()
        {
            let summary = format!("{}/{} answered", succeeded, total);
            if succeeded == 0 {
                pb.abandon_with_message(summary.red().to_string());
            } else {
                pb.finish_with_message(summary.green().to_string());
            }
        }
    }

    fn on_escalation(&self, reason: &str) {
        if let Ok(slot) = self.bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.println(format!("{} escalating: {}", "!".yellow(), reason));
        } else {
            eprintln!("{} escalating: {}", "!".yellow(), reason);
        }
    }
}

/// Simple text-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_dispatch_start(&self, profile: &str, total: usize) {
        eprintln!(
            "{} profile {} ({} providers)",
            "->".cyan(),
            profile.bold(),
            total
        );
    }

    fn on_provider_complete(&self, result: &CallResult) {
        eprintln!("  {}", ProgressReporter::provider_line(result));
    }

    fn on_dispatch_complete(&self, succeeded: usize, total: usize) {
        eprintln!("  {}/{} answered", succeeded, total);
    }

    fn on_escalation(&self, reason: &str) {
        eprintln!("{} escalating: {}", "!".yellow(), reason);
    }
}
