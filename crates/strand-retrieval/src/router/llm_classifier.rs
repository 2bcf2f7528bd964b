//! LLM route classification. Any failure yields `None` and the router falls
//! back to heuristics.

use std::time::Duration;

use strand_core::models::{ConversationTurn, RouteDecision, RouteSource};
use strand_core::traits::{CompletionRequest, ILlmService, LlmTask};
use tracing::{debug, warn};

use crate::parse::parse_route_verdict;
use crate::prompts;

const MAX_TOKENS: usize = 200;

pub async fn classify(
    llm: &dyn ILlmService,
    query: &str,
    conversation: &[ConversationTurn],
    timeout_ms: u64,
) -> Option<RouteDecision> {
    let request = CompletionRequest {
        task: LlmTask::RouteClassification,
        prompt: prompts::route_classification(query, conversation),
        max_tokens: MAX_TOKENS,
        expect_json: true,
    };

    let completion = match tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        llm.complete(&request),
    )
    .await
    {
        Ok(Ok(completion)) => completion,
        Ok(Err(e)) => {
            warn!(provider = llm.name(), error = %e, "route classification failed");
            return None;
        }
        Err(_) => {
            warn!(provider = llm.name(), timeout_ms, "route classification timed out");
            return None;
        }
    };

    match parse_route_verdict(&completion.text) {
        Some(verdict) => Some(RouteDecision {
            route: verdict.route,
            confidence: verdict.confidence,
            rationale: verdict.rationale,
            source: RouteSource::Llm,
        }),
        None => {
            debug!(provider = llm.name(), "unparseable route classification");
            None
        }
    }
}
