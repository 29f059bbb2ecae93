//! Run Consensus use case
//!
//! Fans one request out to every available provider of a profile, waits for
//! all of them and reconciles the surviving payloads into a single answer.

use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::provider_adapter::ProviderAdapter;
use crate::ports::usage::{NoUsage, UsageEvent, UsageObserver, estimate_cost};
use crate::registry::AdapterRegistry;
use quorum_domain::{
    Ballot, CallRequest, CallResult, ConsensusResult, ConsensusStrategy, DomainError,
    EscalationPolicy, Profile, ProviderDescriptor,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Error detail recorded for a provider task that panicked
pub const PANIC_DETAIL: &str = "provider task panicked";

/// Errors that can occur during a consensus call
#[derive(Error, Debug)]
pub enum RunConsensusError {
    #[error("No providers available for profile '{0}'")]
    NoProvidersAvailable(String),

    #[error("All {attempted} providers failed: {}", .errors.join("; "))]
    AllProvidersFailed {
        attempted: usize,
        errors: Vec<String>,
    },

    #[error("Consensus call cancelled")]
    Cancelled,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result of [`RunConsensusUseCase::consensus_call_adaptive`]
#[derive(Debug, Clone)]
pub struct AdaptiveOutcome {
    pub result: ConsensusResult,
    /// Whether the premium profile produced `result`
    pub escalated: bool,
    /// Why the cheap result was rejected
    pub reason: Option<String>,
}

/// Use case for dispatching a request to a profile and reaching consensus
pub struct RunConsensusUseCase {
    registry: Arc<AdapterRegistry>,
    progress: Arc<dyn ProgressNotifier>,
    usage: Arc<dyn UsageObserver>,
    cancel: Option<CancellationToken>,
}

impl RunConsensusUseCase {
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        Self {
            registry,
            progress: Arc::new(NoProgress),
            usage: Arc::new(NoUsage),
            cancel: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_usage(mut self, usage: Arc<dyn UsageObserver>) -> Self {
        self.usage = usage;
        self
    }

    /// Abort every call made through this use case once `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Dispatch to every available provider and return one result per
    /// provider, in profile order.
    pub async fn call_multiple(
        &self,
        profile: &Profile,
        request: &CallRequest,
    ) -> Result<Vec<CallResult>, RunConsensusError> {
        self.dispatch(profile, request, self.cancel.as_ref()).await
    }

    /// Dispatch and reconcile.
    ///
    /// A single surviving response is returned as-is without running the
    /// strategy.
    pub async fn consensus_call(
        &self,
        profile: &Profile,
        request: &CallRequest,
        strategy: &ConsensusStrategy,
    ) -> Result<ConsensusResult, RunConsensusError> {
        let results = self.dispatch(profile, request, self.cancel.as_ref()).await?;
        self.reconcile(&results, strategy)
    }

    /// Like [`consensus_call`](Self::consensus_call), aborted when `token` fires.
    pub async fn consensus_call_with_cancel(
        &self,
        profile: &Profile,
        request: &CallRequest,
        strategy: &ConsensusStrategy,
        token: &CancellationToken,
    ) -> Result<ConsensusResult, RunConsensusError> {
        let results = self.dispatch(profile, request, Some(token)).await?;
        self.reconcile(&results, strategy)
    }

    /// Try the cheap profile first and repeat on the premium profile when
    /// `policy` rejects the result or the cheap profile cannot answer at all.
    pub async fn consensus_call_adaptive(
        &self,
        cheap: &Profile,
        premium: &Profile,
        request: &CallRequest,
        strategy: &ConsensusStrategy,
        policy: &EscalationPolicy,
    ) -> Result<AdaptiveOutcome, RunConsensusError> {
        let reason = match self.consensus_call(cheap, request, strategy).await {
            Ok(result) => match policy.reason(&result) {
                None => {
                    return Ok(AdaptiveOutcome {
                        result,
                        escalated: false,
                        reason: None,
                    });
                }
                Some(reason) => reason,
            },
            Err(e @ (RunConsensusError::Cancelled | RunConsensusError::Domain(_))) => {
                return Err(e);
            }
            Err(e) => e.to_string(),
        };

        info!(
            "Escalating from '{}' to '{}': {}",
            cheap.name(),
            premium.name(),
            reason
        );
        self.progress.on_escalation(&reason);

        let result = self.consensus_call(premium, request, strategy).await?;
        Ok(AdaptiveOutcome {
            result,
            escalated: true,
            reason: Some(reason),
        })
    }

    /// Fold dispatch results into a consensus.
    pub fn reconcile(
        &self,
        results: &[CallResult],
        strategy: &ConsensusStrategy,
    ) -> Result<ConsensusResult, RunConsensusError> {
        let successes: Vec<(&CallResult, &serde_json::Value)> = results
            .iter()
            .filter_map(|r| r.payload().map(|p| (r, p)))
            .collect();

        let consensus = match successes.as_slice() {
            [] => {
                warn!("All {} providers failed", results.len());
                return Err(RunConsensusError::AllProvidersFailed {
                    attempted: results.len(),
                    errors: results
                        .iter()
                        .map(|r| {
                            format!("{}: {}", r.source(), r.error_detail().unwrap_or("unknown"))
                        })
                        .collect(),
                });
            }
            [(only, payload)] => {
                debug!("Single surviving response from {}, skipping strategy", only.source());
                ConsensusResult::single((*payload).clone(), only.source(), results.len())?
            }
            many => {
                let ballots: Vec<Ballot> = many
                    .iter()
                    .map(|(r, payload)| Ballot {
                        provider_id: r.provider_id.clone(),
                        source: r.source(),
                        payload: (*payload).clone(),
                    })
                    .collect();
                let outcome = strategy.apply(&ballots)?;
                let winner = ballots[outcome.winner_index].source.clone();
                ConsensusResult::from_outcome(
                    outcome,
                    winner,
                    strategy.kind(),
                    results.len(),
                    many.len(),
                )?
            }
        };

        info!(
            "Consensus reached: {:.1}% agreement, {}/{} providers answered ({})",
            consensus.agreement_percent(),
            consensus.success_count(),
            consensus.participant_count(),
            consensus
                .strategy_used()
                .map(|k| k.to_string())
                .unwrap_or_else(|| "no strategy".to_string())
        );
        self.usage.record(&UsageEvent::ConsensusReached {
            strategy: consensus.strategy_used(),
            agreement_ratio: consensus.agreement_ratio(),
            success_count: consensus.success_count(),
            participant_count: consensus.participant_count(),
        });

        Ok(consensus)
    }

    async fn dispatch(
        &self,
        profile: &Profile,
        request: &CallRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<CallResult>, RunConsensusError> {
        if cancel.is_some_and(|t| t.is_cancelled()) {
            return Err(RunConsensusError::Cancelled);
        }

        let participants: Vec<(ProviderDescriptor, Arc<dyn ProviderAdapter>)> = profile
            .providers()
            .iter()
            .filter_map(|d| self.registry.resolve(d).map(|a| (d.clone(), a)))
            .collect();
        if participants.is_empty() {
            return Err(RunConsensusError::NoProvidersAvailable(
                profile.name().to_string(),
            ));
        }

        info!(
            "Dispatching to {}/{} providers of profile '{}'",
            participants.len(),
            profile.len(),
            profile.name()
        );
        self.progress
            .on_dispatch_start(profile.name(), participants.len());

        let request = Arc::new(request.clone());
        let timeout = request.timeout;
        let mut join_set = JoinSet::new();

        for (slot, (descriptor, adapter)) in participants.iter().cloned().enumerate() {
            let request = Arc::clone(&request);
            join_set.spawn(async move {
                let started = Instant::now();
                let outcome =
                    tokio::time::timeout(timeout, adapter.submit(&descriptor.model_id, &request))
                        .await;
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let result = match outcome {
                    Ok(Ok(payload)) => CallResult::succeeded(&descriptor, payload, elapsed_ms),
                    Ok(Err(e)) => CallResult::failed(&descriptor, e.to_string(), elapsed_ms),
                    Err(_) => CallResult::timeout(&descriptor, elapsed_ms),
                };
                (slot, result)
            });
        }

        let mut slots: Vec<Option<CallResult>> = vec![None; participants.len()];

        loop {
            let joined = match cancel {
                Some(token) => tokio::select! {
                    biased;

                    _ = token.cancelled() => {
                        warn!("Cancelled with {} providers in flight", join_set.len());
                        join_set.abort_all();
                        return Err(RunConsensusError::Cancelled);
                    }

                    joined = join_set.join_next() => joined,
                },
                None => join_set.join_next().await,
            };

            let Some(joined) = joined else { break };
            match joined {
                Ok((slot, result)) => {
                    self.observe(&participants[slot].0, &request, &result);
                    slots[slot] = Some(result);
                }
                Err(e) => warn!("Provider task join error: {}", e),
            }
        }

        let results: Vec<CallResult> = slots
            .into_iter()
            .zip(&participants)
            .map(|(slot, (descriptor, _))| {
                slot.unwrap_or_else(|| {
                    let result = CallResult::failed(descriptor, PANIC_DETAIL, 0);
                    self.observe(descriptor, &request, &result);
                    result
                })
            })
            .collect();

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        self.progress.on_dispatch_complete(succeeded, results.len());
        Ok(results)
    }

    fn observe(&self, descriptor: &ProviderDescriptor, request: &CallRequest, result: &CallResult) {
        match result.error_detail() {
            None => info!("{} responded in {}ms", result.source(), result.elapsed_ms),
            Some(detail) => warn!(
                "{} failed after {}ms: {}",
                result.source(),
                result.elapsed_ms,
                detail
            ),
        }

        let payload_chars = result
            .payload()
            .map(|p| p.to_string().chars().count())
            .unwrap_or(0);
        self.usage.record(&UsageEvent::ProviderCall {
            provider_id: result.provider_id.clone(),
            model_id: result.model_id.clone(),
            success: result.is_success(),
            elapsed_ms: result.elapsed_ms,
            estimated_cost: estimate_cost(
                descriptor.cost_class,
                request.prompt_chars() + payload_chars,
            ),
        });
        self.progress.on_provider_complete(result);
    }
}
