//! DRIFT: iterative multi-hop retrieval as an explicit state machine.
//!
//! ```text
//! Decompose → Explore → Aggregate → ConfidenceCheck ─┬─ ≥ threshold ──→ Synthesize
//!                ↑                                    ├─ iteration cap ─→ Synthesize
//!                └──────────── ReDecompose ←──────────┘
//! ```
//!
//! Aggregate folds every outcome so far into a running context. ReDecompose
//! hands that context to the refiner, and Synthesize returns it as is.
//!
//! Explore fans out one task per pending sub-question and waits for all of
//! them. Sub-question failures are recorded on the outcome, never retried in
//! place; ReDecompose is the only way a gap is asked again, and only with
//! new wording.

pub mod aggregate;
pub mod confidence;
pub mod decompose;
pub mod explore;
pub mod state;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use strand_core::config::DriftConfig;
use strand_core::errors::{StrandError, StrandResult};
use strand_core::models::{
    DriftTermination, EvidenceItem, PartialFailure, SeedTier, SubQuestion, SubQuestionOutcome,
};
use strand_core::traits::IConfidenceScorer;
use strand_observability::{drift_span, events};
use tokio_util::sync::CancellationToken;
use tracing::{debug, Instrument};

use crate::context::{QueryContext, Retrievers};
pub use state::{DriftPhase, DriftState};

/// Everything a DRIFT run produced.
#[derive(Debug, Clone)]
pub struct DriftReport {
    pub evidence: Vec<EvidenceItem>,
    pub partial_answers: Vec<String>,
    pub iterations: usize,
    pub confidence: f64,
    pub termination: DriftTermination,
    pub trace: Vec<DriftPhase>,
    pub loop_transitions: usize,
    pub outcomes: Vec<SubQuestionOutcome>,
    pub failures: Vec<PartialFailure>,
    pub cache_hits: usize,
    pub seeds_per_tier: BTreeMap<SeedTier, usize>,
}

impl DriftReport {
    pub fn answered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.has_evidence()).count()
    }
}

pub struct DriftWorkflow {
    config: DriftConfig,
    scorer: Arc<dyn IConfidenceScorer>,
}

impl DriftWorkflow {
    pub fn new(config: DriftConfig) -> Self {
        let scorer = confidence::scorer_for(&config);
        Self { config, scorer }
    }

    pub fn with_scorer(config: DriftConfig, scorer: Arc<dyn IConfidenceScorer>) -> Self {
        Self { config, scorer }
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Run the workflow to Terminal. Only cancellation and fatal store errors
    /// escape; everything else is folded into the report.
    pub async fn run(
        &self,
        query: &str,
        ctx: &QueryContext<'_>,
        retrievers: &Retrievers<'_>,
        top_k: usize,
        cancel: &CancellationToken,
    ) -> StrandResult<DriftReport> {
        let span = drift_span!(ctx.tenant, self.config.max_iterations);
        self.drive(query, ctx, retrievers, top_k, cancel)
            .instrument(span)
            .await
    }

    async fn drive(
        &self,
        query: &str,
        ctx: &QueryContext<'_>,
        retrievers: &Retrievers<'_>,
        top_k: usize,
        cancel: &CancellationToken,
    ) -> StrandResult<DriftReport> {
        let max_iterations = self.config.max_iterations.max(1);
        let mut state = DriftState::new();
        let mut failures: Vec<PartialFailure> = Vec::new();
        let mut cache_hits = 0;
        let mut seeds_per_tier: BTreeMap<SeedTier, usize> = BTreeMap::new();
        let mut synthesized = None;

        loop {
            if cancel.is_cancelled() {
                return Err(StrandError::Cancelled);
            }
            debug!(phase = %state.phase, iteration = state.iteration, "drift phase");

            match state.phase {
                DriftPhase::Decompose => {
                    let decomposition =
                        decompose::decompose(query, ctx.llm, &self.config).await;
                    failures.extend(decomposition.failure);
                    for text in decomposition.questions {
                        if state.mark_asked(&text) {
                            let id = state.next_id(1);
                            state.pending.push(SubQuestion::root(id, text, query));
                        }
                    }
                    if state.pending.is_empty() {
                        state.mark_asked(query);
                        let id = state.next_id(1);
                        state.pending.push(SubQuestion::root(id, query, query));
                    }
                    state.transition(DriftPhase::Explore);
                }

                DriftPhase::Explore => {
                    let pending = std::mem::take(&mut state.pending);
                    let explored =
                        explore::explore_all(pending, ctx, retrievers, &self.config, cancel)
                            .await;
                    if cancel.is_cancelled() {
                        return Err(StrandError::Cancelled);
                    }
                    for item in explored {
                        failures.extend(item.failures);
                        cache_hits += item.cache_hits;
                        for (tier, count) in item.seeds_per_tier {
                            *seeds_per_tier.entry(tier).or_default() += count;
                        }
                        state.outcomes.push(item.outcome);
                    }
                    state.transition(DriftPhase::Aggregate);
                }

                DriftPhase::Aggregate => {
                    state.context = aggregate::aggregate(&state.outcomes, top_k);
                    debug!(
                        iteration = state.iteration,
                        evidence = state.context.evidence.len(),
                        partial_answers = state.context.partial_answers.len(),
                        "drift context aggregated"
                    );
                    state.transition(DriftPhase::ConfidenceCheck);
                }

                DriftPhase::ConfidenceCheck => {
                    let total = state.round(state.iteration).count();
                    let answered = state
                        .round(state.iteration)
                        .filter(|o| o.has_evidence())
                        .count();
                    state.confidence = self.scorer.score(&state.outcomes);
                    events::drift_round_completed(
                        state.iteration,
                        answered,
                        total,
                        state.confidence,
                    );

                    if state.confidence >= self.config.confidence_threshold {
                        state.termination = Some(DriftTermination::ConfidenceReached);
                        state.transition(DriftPhase::Synthesize);
                    } else if state.iteration >= max_iterations {
                        state.termination = Some(DriftTermination::IterationCap);
                        state.transition(DriftPhase::Synthesize);
                    } else {
                        state.transition(DriftPhase::ReDecompose);
                    }
                }

                DriftPhase::ReDecompose => {
                    let gaps = self.gaps(&state);
                    let mut children = Vec::new();
                    if !gaps.is_empty() {
                        let refinement =
                            decompose::refine(query, &gaps, &state.context, ctx.llm, &self.config)
                                .await;
                        failures.extend(refinement.failure);
                        let next_iteration = state.iteration + 1;
                        for (gap_index, text) in refinement.questions {
                            if children.len() >= self.config.max_sub_questions.max(1) {
                                break;
                            }
                            if state.mark_asked(&text) {
                                let id = state.next_id(next_iteration);
                                children.push(gaps[gap_index].refine(id, text, next_iteration));
                            }
                        }
                    }

                    if children.is_empty() {
                        state.termination = Some(DriftTermination::NoFurtherRefinement);
                        state.transition(DriftPhase::Synthesize);
                    } else {
                        state.pending = children;
                        state.transition(DriftPhase::Explore);
                    }
                }

                DriftPhase::Synthesize => {
                    synthesized = Some(std::mem::take(&mut state.context));
                    let termination = state
                        .termination
                        .unwrap_or(DriftTermination::IterationCap);
                    events::drift_terminated(termination, state.iteration, state.confidence);
                    state.transition(DriftPhase::Terminal);
                }

                DriftPhase::Terminal => break,
            }
        }

        let aggregated = synthesized.unwrap_or_default();
        Ok(DriftReport {
            evidence: aggregated.evidence,
            partial_answers: aggregated.partial_answers,
            iterations: state.iteration,
            confidence: state.confidence,
            termination: state
                .termination
                .unwrap_or(DriftTermination::IterationCap),
            trace: state.trace,
            loop_transitions: state.loop_transitions,
            outcomes: state.outcomes,
            failures,
            cache_hits,
            seeds_per_tier,
        })
    }

    /// The most recent outcome of every topic still without evidence, if it
    /// may be refined further.
    fn gaps(&self, state: &DriftState) -> Vec<SubQuestion> {
        let covered: HashSet<&str> = state
            .outcomes
            .iter()
            .filter(|o| o.has_evidence())
            .map(|o| o.sub_question.topic.as_str())
            .collect();

        let mut latest: BTreeMap<&str, &SubQuestion> = BTreeMap::new();
        for outcome in &state.outcomes {
            let topic = outcome.sub_question.topic.as_str();
            if !covered.contains(topic) {
                latest.insert(topic, &outcome.sub_question);
            }
        }
        latest
            .into_values()
            .filter(|sq| sq.depth < self.config.max_redecompose_depth)
            .cloned()
            .collect()
    }
}
