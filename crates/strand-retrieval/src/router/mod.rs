//! Query router: picks one of four retrieval routes per query.
//!
//! Priority: forced override > combined heuristic/LLM verdict > multi-hop
//! fallback. Routing never fails.

pub mod heuristics;
pub mod llm_classifier;

use strand_core::config::RouterConfig;
use strand_core::models::{ConversationTurn, Route, RouteDecision, RouteSource};
use strand_core::traits::ILlmService;
use strand_observability::events;

#[derive(Debug, Clone)]
pub struct Router {
    config: RouterConfig,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub async fn route(
        &self,
        query: &str,
        forced: Option<Route>,
        conversation: &[ConversationTurn],
        llm: Option<&dyn ILlmService>,
    ) -> RouteDecision {
        let decision = match forced {
            Some(route) => RouteDecision::forced(route),
            None => {
                let heuristic = heuristics::classify(query, conversation, &self.config);
                let llm_verdict = match llm {
                    Some(llm) if self.config.llm_enabled => {
                        llm_classifier::classify(llm, query, conversation, self.config.llm_timeout_ms)
                            .await
                    }
                    _ => None,
                };
                self.combine(heuristic, llm_verdict)
            }
        };
        events::route_selected(&decision);
        decision
    }

    /// Combine a heuristic decision with an optional LLM verdict.
    pub fn combine(&self, heuristic: RouteDecision, llm: Option<RouteDecision>) -> RouteDecision {
        let combined = match llm {
            None => heuristic,
            Some(llm) if llm.route == heuristic.route => RouteDecision {
                route: llm.route,
                confidence: llm.confidence.max(heuristic.confidence),
                rationale: format!("heuristics and llm agree: {}", heuristic.rationale),
                source: RouteSource::Combined,
            },
            Some(llm) => {
                let (strong, weak) = if llm.confidence >= heuristic.confidence {
                    (llm, heuristic)
                } else {
                    (heuristic, llm)
                };
                if strong.confidence >= self.config.min_confidence
                    && strong.confidence - weak.confidence >= self.config.disagreement_margin
                {
                    strong
                } else {
                    RouteDecision {
                        route: Route::MultiHop,
                        confidence: strong.confidence,
                        rationale: format!(
                            "signals disagree ({} {:.2} vs {} {:.2})",
                            strong.route, strong.confidence, weak.route, weak.confidence
                        ),
                        source: RouteSource::Fallback,
                    }
                }
            }
        };

        if combined.confidence < self.config.min_confidence && combined.route != Route::MultiHop {
            return RouteDecision {
                route: Route::MultiHop,
                confidence: combined.confidence,
                rationale: format!(
                    "low confidence {:.2} for {}: {}",
                    combined.confidence, combined.route, combined.rationale
                ),
                source: RouteSource::Fallback,
            };
        }
        combined
    }
}
