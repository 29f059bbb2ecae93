//! Cached Consensus use case
//!
//! Sits in front of [`RunConsensusUseCase`]: answers repeated questions from
//! the cache, picks a profile through the tier selector, and folds several
//! uncached questions into a single dispatch.

use super::run_consensus::{RunConsensusError, RunConsensusUseCase};
use crate::cache::{ConsensusCache, cache_key};
use crate::config::{CacheParams, ConsensusParams};
use crate::ports::usage::{NoUsage, UsageEvent, UsageObserver};
use futures::future::try_join_all;
use quorum_domain::request::batch::{compose_batch_prompt, split_batch_answer};
use quorum_domain::{
    CallRequest, Complexity, ConsensusResult, DomainError, Profile, ProfileCatalog, ProfileRef,
    Question, Tier, TierDecision, TierSelector,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Who is asking and how the profile should be chosen
#[derive(Debug, Clone, Default)]
pub struct ConsensusQuery {
    /// Identity of the caller; part of the cache key.
    pub agent: String,
    /// Explicit complexity; estimated from the question when absent.
    pub complexity: Option<Complexity>,
    /// Task type checked against the tier override table.
    pub task_type: Option<String>,
    /// Bypasses tier selection entirely.
    pub profile: Option<ProfileRef>,
}

impl ConsensusQuery {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            ..Self::default()
        }
    }

    pub fn with_complexity(mut self, complexity: Option<Complexity>) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_task_type(mut self, task_type: Option<String>) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn with_profile(mut self, profile: Option<ProfileRef>) -> Self {
        self.profile = profile;
        self
    }
}

/// One question of a batch, with the identifier its answer is keyed by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionItem {
    pub id: String,
    pub question: String,
}

impl QuestionItem {
    pub fn new(id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
        }
    }
}

/// A consensus together with how it was obtained
#[derive(Debug, Clone)]
pub struct ConsensusAnswer {
    pub result: Arc<ConsensusResult>,
    pub from_cache: bool,
    /// Tier decision that picked the profile, if tier selection ran
    pub decision: Option<TierDecision>,
    pub escalated: bool,
}

struct Pending {
    ids: Vec<String>,
    question: Question,
    key: String,
}

/// Use case for cached, tier-routed consensus
pub struct CachedConsensusUseCase {
    orchestrator: Arc<RunConsensusUseCase>,
    cache: Arc<ConsensusCache>,
    catalog: ProfileCatalog,
    selector: TierSelector,
    params: ConsensusParams,
    cache_params: CacheParams,
    usage: Arc<dyn UsageObserver>,
}

impl CachedConsensusUseCase {
    pub fn new(
        orchestrator: Arc<RunConsensusUseCase>,
        cache: Arc<ConsensusCache>,
        catalog: ProfileCatalog,
    ) -> Self {
        Self {
            orchestrator,
            cache,
            catalog,
            selector: TierSelector::default(),
            params: ConsensusParams::default(),
            cache_params: CacheParams::default(),
            usage: Arc::new(NoUsage),
        }
    }

    pub fn with_selector(mut self, selector: TierSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_params(mut self, params: ConsensusParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_cache_params(mut self, cache_params: CacheParams) -> Self {
        self.cache_params = cache_params;
        self
    }

    pub fn with_usage(mut self, usage: Arc<dyn UsageObserver>) -> Self {
        self.usage = usage;
        self
    }

    pub fn cache(&self) -> &Arc<ConsensusCache> {
        &self.cache
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    /// Cache key a question would be stored under for `agent`.
    pub fn key_for(&self, agent: &str, question: &str) -> Result<String, RunConsensusError> {
        let question = parse_question(question, "question")?;
        Ok(cache_key(
            agent,
            &question,
            self.cache_params.key_prefix_bytes,
        ))
    }

    /// Answer one question, from the cache when possible.
    pub async fn get_consensus(
        &self,
        question: &str,
        query: &ConsensusQuery,
    ) -> Result<ConsensusAnswer, RunConsensusError> {
        let question = parse_question(question, "question")?;
        let key = cache_key(
            &query.agent,
            &question,
            self.cache_params.key_prefix_bytes,
        );

        if let Some(hit) = self.lookup(&key) {
            return Ok(hit);
        }
        self.answer_uncached(&question, &key, query).await
    }

    /// Answer several questions with at most one combined dispatch.
    ///
    /// Cached questions are answered directly; the rest are numbered into
    /// one prompt. Entries of the combined reply that are missing or break
    /// the output schema are asked again individually.
    pub async fn get_consensus_for_multiple(
        &self,
        items: &[QuestionItem],
        query: &ConsensusQuery,
    ) -> Result<BTreeMap<String, ConsensusAnswer>, RunConsensusError> {
        let mut answers = BTreeMap::new();
        let mut pending: Vec<Pending> = Vec::new();

        for item in items {
            let question = parse_question(&item.question, &item.id)?;
            let key = cache_key(
                &query.agent,
                &question,
                self.cache_params.key_prefix_bytes,
            );

            if let Some(same) = pending.iter_mut().find(|p| p.key == key) {
                same.ids.push(item.id.clone());
                continue;
            }
            match self.lookup(&key) {
                Some(hit) => {
                    answers.insert(item.id.clone(), hit);
                }
                None => pending.push(Pending {
                    ids: vec![item.id.clone()],
                    question,
                    key,
                }),
            }
        }

        match pending.len() {
            0 => {
                info!("All {} questions answered from cache", items.len());
                return Ok(answers);
            }
            1 => {
                let only = &pending[0];
                let answer = self.answer_uncached(&only.question, &only.key, query).await?;
                for id in &only.ids {
                    answers.insert(id.clone(), answer.clone());
                }
                return Ok(answers);
            }
            _ => {}
        }

        let total = pending.len();
        let texts: Vec<&str> = pending.iter().map(|p| p.question.content()).collect();
        let (profile, decision) = self.plan(&texts.join("\n"), query)?;

        let mut request = self.params.request(compose_batch_prompt(
            &texts,
            self.params.output_schema.as_ref(),
        ));
        // The combined reply has its own shape; parts are validated below
        request.output_schema = None;

        info!(
            "Combining {} uncached questions into one request ({} cached)",
            total,
            answers.len()
        );
        let (combined, escalated) = self.dispatch(&profile, &request).await?;
        let parts = split_batch_answer(combined.winning_payload(), total);

        let mut fallbacks = Vec::new();
        for (i, (entry, part)) in pending.into_iter().zip(parts).enumerate() {
            let usable = part.filter(|payload| {
                self.params
                    .output_schema
                    .as_ref()
                    .is_none_or(|schema| schema.validate(payload).is_ok())
            });

            match usable {
                Some(payload) => {
                    let derived = combined.derived(
                        payload,
                        format!(
                            "answer {} of {} from a combined request; {}",
                            i + 1,
                            total,
                            combined.explanation()
                        ),
                    );
                    let result = self.cache.insert(entry.key.clone(), derived);
                    for id in &entry.ids {
                        answers.insert(
                            id.clone(),
                            ConsensusAnswer {
                                result: Arc::clone(&result),
                                from_cache: false,
                                decision: decision.clone(),
                                escalated,
                            },
                        );
                    }
                }
                None => {
                    warn!(
                        "Combined reply has no usable answer for question {} of {}, asking individually",
                        i + 1,
                        total
                    );
                    fallbacks.push(entry);
                }
            }
        }

        let individual = try_join_all(
            fallbacks
                .iter()
                .map(|entry| self.answer_uncached(&entry.question, &entry.key, query)),
        )
        .await?;
        for (entry, answer) in fallbacks.iter().zip(individual) {
            for id in &entry.ids {
                answers.insert(id.clone(), answer.clone());
            }
        }

        Ok(answers)
    }

    fn lookup(&self, key: &str) -> Option<ConsensusAnswer> {
        match self.cache.get(key) {
            Some(result) => {
                debug!("Cache hit: {}", key);
                self.usage.record(&UsageEvent::CacheHit {
                    key: key.to_string(),
                });
                Some(ConsensusAnswer {
                    result,
                    from_cache: true,
                    decision: None,
                    escalated: false,
                })
            }
            None => {
                debug!("Cache miss: {}", key);
                self.usage.record(&UsageEvent::CacheMiss {
                    key: key.to_string(),
                });
                None
            }
        }
    }

    async fn answer_uncached(
        &self,
        question: &Question,
        key: &str,
        query: &ConsensusQuery,
    ) -> Result<ConsensusAnswer, RunConsensusError> {
        let (profile, decision) = self.plan(question.content(), query)?;
        let request = self.params.request(question.content());
        let (result, escalated) = self.dispatch(&profile, &request).await?;
        Ok(ConsensusAnswer {
            result: self.cache.insert(key, result),
            from_cache: false,
            decision,
            escalated,
        })
    }

    /// Pick the profile for a request.
    fn plan(
        &self,
        text: &str,
        query: &ConsensusQuery,
    ) -> Result<(Profile, Option<TierDecision>), RunConsensusError> {
        if let Some(profile) = &query.profile {
            return Ok((self.catalog.resolve(profile)?, None));
        }

        let decision = self
            .selector
            .select(query.complexity, query.task_type.as_deref(), text);
        info!(
            "Tier {} -> profile '{}' ({})",
            decision.tier, decision.profile_name, decision.reason
        );
        let profile = self
            .catalog
            .resolve(&ProfileRef::Named(decision.profile_name.clone()))?;
        Ok((profile, Some(decision)))
    }

    /// Run the consensus call, escalating to the expensive tier's profile
    /// when an escalation policy is configured.
    async fn dispatch(
        &self,
        profile: &Profile,
        request: &CallRequest,
    ) -> Result<(ConsensusResult, bool), RunConsensusError> {
        let strategy = &self.params.strategy;

        if let Some(policy) = &self.params.escalation {
            let premium_name = self.selector.profile_for(Tier::Expensive);
            if premium_name != profile.name() {
                let premium = self
                    .catalog
                    .resolve(&ProfileRef::Named(premium_name.to_string()))?;
                let outcome = self
                    .orchestrator
                    .consensus_call_adaptive(profile, &premium, request, strategy, policy)
                    .await?;
                return Ok((outcome.result, outcome.escalated));
            }
        }

        let result = self
            .orchestrator
            .consensus_call(profile, request, strategy)
            .await?;
        Ok((result, false))
    }
}

fn parse_question(text: &str, label: &str) -> Result<Question, DomainError> {
    Question::parse(text)
        .map_err(|_| DomainError::InvalidQuestion(format!("{} is empty", label)))
}
