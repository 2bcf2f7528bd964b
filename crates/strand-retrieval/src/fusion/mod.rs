//! HybridSearcher coordinating lexical + vector passage search, RRF fusion
//! and the post-fusion authority boost.

pub mod boost;
pub mod rrf;

use std::collections::HashMap;
use std::time::Duration;

use strand_core::config::FusionConfig;
use strand_core::errors::{StrandError, StrandResult};
use strand_core::models::{
    EvidenceItem, EvidenceSource, Node, NodeClass, PartialFailure, ScoredNode,
};
use strand_observability::events;
use tracing::debug;

use crate::context::QueryContext;
use crate::evidence;
use crate::guard::guarded;
use boost::{apply_authority_boost, BoostedPassage};

/// Output of a hybrid search. Failed sides are reported, not raised.
#[derive(Debug, Clone, Default)]
pub struct HybridOutcome {
    pub passages: Vec<BoostedPassage>,
    pub failures: Vec<PartialFailure>,
}

impl HybridOutcome {
    /// Package as evidence, ranked from 1 in boosted order.
    pub fn to_evidence(&self, source: EvidenceSource) -> Vec<EvidenceItem> {
        self.passages
            .iter()
            .enumerate()
            .map(|(i, p)| evidence::from_node(&p.node, p.score, source.clone(), i + 1))
            .collect()
    }
}

/// Hybrid search combining full-text and vector similarity over passages via
/// Reciprocal Rank Fusion.
#[derive(Debug, Clone)]
pub struct HybridSearcher {
    config: FusionConfig,
}

impl HybridSearcher {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Run both sides concurrently, each under its own timeout, then fuse,
    /// boost and truncate to `top_k`. A failing side contributes an empty list.
    pub async fn search(&self, ctx: &QueryContext<'_>, query: &str, top_k: usize) -> HybridOutcome {
        if query.trim().is_empty() || top_k == 0 {
            return HybridOutcome::default();
        }
        let limit = top_k * self.config.overfetch.max(1);
        let timeout_ms = self.config.search_timeout_ms;

        let lexical = guarded(
            "fusion:lexical",
            timeout_ms,
            ctx.store
                .search_full_text(ctx.tenant, query, Some(NodeClass::Passage), limit),
        );
        let vector = guarded("fusion:vector", timeout_ms, vector_side(ctx, query, limit));
        let (lexical, vector) = tokio::join!(lexical, vector);

        let mut failures = Vec::new();
        let mut nodes: HashMap<String, Node> = HashMap::new();
        let mut side_ids = |side: Result<Vec<ScoredNode>, PartialFailure>, unit: &str| {
            match side {
                Ok(hits) => hits
                    .into_iter()
                    .filter(|hit| {
                        if &hit.node.tenant_id != ctx.tenant {
                            events::tenant_violation(
                                ctx.tenant.as_str(),
                                hit.node.tenant_id.as_str(),
                                unit,
                            );
                            return false;
                        }
                        hit.node.is_passage()
                    })
                    .map(|hit| {
                        let id = hit.node.id.clone();
                        nodes.entry(id.clone()).or_insert(hit.node);
                        id
                    })
                    .collect::<Vec<_>>(),
                Err(failure) => {
                    failures.push(failure);
                    Vec::new()
                }
            }
        };
        let lexical_ids = side_ids(lexical, "fusion:lexical");
        let vector_ids = side_ids(vector, "fusion:vector");

        let fused = rrf::fuse(&lexical_ids, &vector_ids, self.config.rrf_k);
        let mut passages = apply_authority_boost(fused, &nodes, &self.config);
        passages.truncate(top_k);

        debug!(
            lexical = lexical_ids.len(),
            vector = vector_ids.len(),
            fused = passages.len(),
            "hybrid search complete"
        );
        HybridOutcome { passages, failures }
    }
}

async fn vector_side(ctx: &QueryContext<'_>, query: &str, limit: usize) -> StrandResult<Vec<ScoredNode>> {
    let embedding = tokio::time::timeout(
        Duration::from_millis(ctx.embed_timeout_ms),
        ctx.embedder.embed(query),
    )
    .await
    .map_err(|_| StrandError::Timeout {
        operation: "embed".to_string(),
        timeout_ms: ctx.embed_timeout_ms,
    })??;
    ctx.store
        .search_vector(ctx.tenant, &embedding, Some(NodeClass::Passage), limit)
        .await
}
