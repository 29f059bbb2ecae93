//! Linear-backoff retry for provider calls

use quorum_application::ports::provider_adapter::ProviderError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How many times a provider call is attempted and how long to wait between tries.
///
/// The wait before retry `n` (1-based) is `step * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one (minimum 1).
    pub max_attempts: u32,
    /// Backoff step in milliseconds.
    pub step_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            step_ms: 500,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts,
            step_ms: step.as_millis() as u64,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay before the given retry (1 = first retry).
    pub fn delay_for(&self, retry: u32) -> Duration {
        Duration::from_millis(self.step_ms.saturating_mul(u64::from(retry)))
    }

    /// Sum of every backoff wait when all attempts are used.
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts.max(1)).map(|retry| self.delay_for(retry)).sum()
    }

    /// Timeout for one attempt so that all attempts and their backoff fit in `budget`.
    ///
    /// When the backoff alone exceeds the budget, the budget is split evenly
    /// across attempts instead.
    pub fn attempt_timeout(&self, budget: Duration) -> Duration {
        let attempts = self.max_attempts.max(1);
        let share = budget.saturating_sub(self.total_backoff()) / attempts;
        if share.is_zero() {
            budget / attempts
        } else {
            share
        }
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or
    /// attempts are exhausted. The last error is returned.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, ProviderError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => {
                    debug!("{}: non-retryable error on attempt {}: {}", label, attempt, e);
                    return Err(e);
                }
                Err(e) if attempt >= attempts => {
                    warn!("{}: giving up after {} attempts: {}", label, attempt, e);
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {:?}",
                        label, attempt, attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[test]
    fn test_linear_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(1500));
    }

    #[test]
    fn test_attempt_timeout_leaves_room_for_retries() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.total_backoff(), Duration::from_millis(1500));
        assert_eq!(
            policy.attempt_timeout(Duration::from_secs(60)),
            Duration::from_millis(19_500)
        );

        let once = RetryPolicy::none();
        assert_eq!(once.attempt_timeout(Duration::from_secs(5)), Duration::from_secs(5));
    }

    #[test]
    fn test_attempt_timeout_when_backoff_exceeds_budget() {
        let policy = RetryPolicy::new(4, Duration::from_secs(10));
        assert_eq!(
            policy.attempt_timeout(Duration::from_secs(2)),
            Duration::from_millis(500)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let seen = Mutex::new(Vec::new());
        let start = Instant::now();

        let result = policy
            .run("test", |attempt| {
                seen.lock().unwrap().push(attempt);
                async move {
                    if attempt < 3 {
                        Err(ProviderError::Http {
                            status: 503,
                            body: "busy".to_string(),
                        })
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
        // 100ms + 200ms of backoff
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_last_error_when_exhausted() {
        let policy = RetryPolicy::new(2, Duration::from_millis(10));
        let result: Result<(), _> = policy
            .run("test", |attempt| async move {
                Err(ProviderError::MalformedResponse(format!("attempt {}", attempt)))
            })
            .await;
        assert_eq!(
            result,
            Err(ProviderError::MalformedResponse("attempt 2".to_string()))
        );
    }

    #[tokio::test]
    async fn test_non_retryable_stops_immediately() {
        let policy = RetryPolicy::default();
        let calls = Mutex::new(0);
        let result: Result<(), _> = policy
            .run("test", |_| {
                *calls.lock().unwrap() += 1;
                async {
                    Err(ProviderError::Http {
                        status: 401,
                        body: "unauthorized".to_string(),
                    })
                }
            })
            .await;
        assert!(matches!(result, Err(ProviderError::Http { status: 401, .. })));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_is_not_retried() {
        let policy = RetryPolicy::default();
        let calls = Mutex::new(0);
        let _ = policy
            .run::<(), _, _>("test", |_| {
                *calls.lock().unwrap() += 1;
                async { Err(ProviderError::MissingCredential("KEY".to_string())) }
            })
            .await;
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        let result = policy.run("test", |a| async move { Ok::<_, ProviderError>(a) }).await;
        assert_eq!(result, Ok(1));
    }
}
