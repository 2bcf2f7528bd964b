//! Explore: run every pending sub-question concurrently, each under its own
//! deadline and child cancellation token.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::future::join_all;
use strand_core::config::DriftConfig;
use strand_core::errors::StrandError;
use strand_core::models::{
    EvidenceItem, EvidenceSource, ExplorationMethod, ExplorationStatus, FailureKind,
    PartialFailure, SeedTier, SubQuestion, SubQuestionOutcome,
};
use strand_core::traits::{CompletionRequest, LlmTask};
use strand_observability::{events, sub_question_span};
use tokio_util::sync::CancellationToken;
use tracing::{debug, Instrument};

use crate::context::{QueryContext, Retrievers};
use crate::evidence;
use crate::guard::{contain, guarded, is_fatal};
use crate::prompts;

const ANSWER_MAX_TOKENS: usize = 300;

/// One explored sub-question plus what it cost.
#[derive(Debug, Clone)]
pub struct Explored {
    pub outcome: SubQuestionOutcome,
    pub failures: Vec<PartialFailure>,
    pub cache_hits: usize,
    pub seeds_per_tier: BTreeMap<SeedTier, usize>,
}

impl Explored {
    fn unanswered(sub_question: SubQuestion, status: ExplorationStatus, failure: PartialFailure) -> Self {
        Self {
            outcome: SubQuestionOutcome::unanswered(sub_question, status),
            failures: vec![failure],
            cache_hits: 0,
            seeds_per_tier: BTreeMap::new(),
        }
    }
}

/// Explore all `pending` sub-questions. Output order matches input order and
/// every sub-question yields exactly one outcome.
pub async fn explore_all(
    pending: Vec<SubQuestion>,
    ctx: &QueryContext<'_>,
    retrievers: &Retrievers<'_>,
    config: &DriftConfig,
    cancel: &CancellationToken,
) -> Vec<Explored> {
    join_all(
        pending
            .into_iter()
            .map(|sq| explore_guarded(sq, ctx, retrievers, config, cancel)),
    )
    .await
}

async fn explore_guarded(
    sub_question: SubQuestion,
    ctx: &QueryContext<'_>,
    retrievers: &Retrievers<'_>,
    config: &DriftConfig,
    parent: &CancellationToken,
) -> Explored {
    let token = parent.child_token();
    let unit = format!("drift:sub_question:{}", sub_question.id);
    let deadline = Duration::from_millis(config.sub_question_timeout_ms);
    let span = sub_question_span!(sub_question.id);

    let work = explore_one(sub_question.clone(), ctx, retrievers, config, &token);
    let result = async {
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            res = tokio::time::timeout(deadline, work) => Some(res),
        }
    }
    .instrument(span)
    .await;

    match result {
        None => Explored::unanswered(
            sub_question,
            ExplorationStatus::Cancelled,
            PartialFailure::new(unit, FailureKind::Cancelled, "cancelled"),
        ),
        Some(Err(_)) => {
            // Stop any PPR still running for this sub-question.
            token.cancel();
            let failure = PartialFailure::new(
                unit,
                FailureKind::Timeout,
                format!("timed out after {}ms", config.sub_question_timeout_ms),
            );
            events::degradation_triggered(&failure);
            Explored::unanswered(sub_question, ExplorationStatus::TimedOut, failure)
        }
        Some(Ok(Ok(explored))) => explored,
        Some(Ok(Err(StrandError::Cancelled))) => Explored::unanswered(
            sub_question,
            ExplorationStatus::Cancelled,
            PartialFailure::new(unit, FailureKind::Cancelled, "cancelled"),
        ),
        Some(Ok(Err(e))) => {
            let failure = contain(&unit, &e);
            Explored::unanswered(
                sub_question,
                ExplorationStatus::Failed {
                    reason: e.to_string(),
                },
                failure,
            )
        }
    }
}

/// Seeds, then PPR; hybrid fusion when the walk yields nothing.
async fn explore_one(
    sub_question: SubQuestion,
    ctx: &QueryContext<'_>,
    retrievers: &Retrievers<'_>,
    config: &DriftConfig,
    token: &CancellationToken,
) -> Result<Explored, StrandError> {
    let per_question = config.evidence_per_sub_question.max(1);
    let mut failures = Vec::new();
    let mut cache_hits = 0;
    let mut method = ExplorationMethod::None;
    let mut found: Vec<EvidenceItem> = Vec::new();

    let resolution = retrievers.resolver.resolve(ctx, &sub_question.text).await;
    failures.extend(resolution.failures.iter().cloned());

    if !resolution.is_no_seeds() {
        match retrievers
            .walker
            .walk(ctx, &resolution.seeds, per_question, token)
            .await
        {
            Ok(walk) => {
                if walk.cache_hit {
                    cache_hits += 1;
                }
                if !walk.evidence.is_empty() {
                    method = ExplorationMethod::GraphWalk;
                    found = walk.evidence;
                }
            }
            Err(e) if is_fatal(&e) => return Err(e),
            Err(e) => failures.push(contain("drift:walk", &e)),
        }
    }

    if found.is_empty() {
        let fused = retrievers
            .searcher
            .search(ctx, &sub_question.text, per_question)
            .await;
        failures.extend(fused.failures.iter().cloned());
        found = fused.to_evidence(EvidenceSource::Fusion);
        if !found.is_empty() {
            method = ExplorationMethod::Fusion;
        }
    }

    let source = EvidenceSource::SubQuestion {
        sub_question_id: sub_question.id.clone(),
    };
    let mut found = evidence::retain_tenant(found, ctx.tenant, "drift:explore");
    found.truncate(per_question);
    for item in &mut found {
        item.citation.source = source.clone();
    }
    evidence::rerank(&mut found);

    let partial_answer = if config.answer_sub_questions && !found.is_empty() {
        match ctx.llm {
            Some(llm) => {
                let request = CompletionRequest {
                    task: LlmTask::SubQuestionAnswer,
                    prompt: prompts::sub_question_answer(&sub_question.text, &found),
                    max_tokens: ANSWER_MAX_TOKENS,
                    expect_json: false,
                };
                let unit = format!("drift:answer:{}", sub_question.id);
                match guarded(&unit, config.llm_timeout_ms, llm.complete(&request)).await {
                    Ok(completion) => Some(completion.text.trim().to_string()).filter(|t| !t.is_empty()),
                    Err(failure) => {
                        failures.push(failure);
                        None
                    }
                }
            }
            None => None,
        }
    } else {
        None
    };

    let status = if found.is_empty() {
        ExplorationStatus::Empty
    } else {
        ExplorationStatus::Answered
    };
    debug!(
        sub_question = %sub_question.id,
        seeds = resolution.seeds.len(),
        evidence = found.len(),
        method = ?method,
        "sub-question explored"
    );

    Ok(Explored {
        outcome: SubQuestionOutcome {
            seed_count: resolution.seeds.len(),
            sub_question,
            status,
            evidence: found,
            partial_answer,
            method,
        },
        failures,
        cache_hits,
        seeds_per_tier: resolution.per_tier,
    })
}
