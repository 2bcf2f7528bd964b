//! Graph walk: seeds → bounded neighborhood → PPR → passage evidence.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use strand_core::config::{CacheConfig, PprConfig};
use strand_core::errors::{RetrievalError, StrandError, StrandResult};
use strand_core::models::{EvidenceItem, EvidenceSource, Node, SeedCandidate, TenantId};
use strand_graph::{CacheKey, PprEngine, ResultCache, UnifiedGraph};
use strand_observability::{events, ppr_span};
use tokio_util::sync::CancellationToken;
use tracing::{warn, Instrument};

use crate::context::QueryContext;
use crate::evidence;

/// Result of one walk.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Passage evidence, best first, ranked from 1.
    pub evidence: Vec<EvidenceItem>,
    pub iterations: usize,
    pub converged: bool,
    pub damping: f64,
    pub node_count: usize,
    /// Served from the result cache.
    pub cache_hit: bool,
}

/// Runs personalized pagerank around a seed set and returns ranked passages.
pub struct GraphWalker {
    engine: PprEngine,
    cache: ResultCache<Arc<WalkOutcome>>,
}

impl GraphWalker {
    pub fn new(ppr: PprConfig, cache: &CacheConfig) -> Self {
        Self {
            engine: PprEngine::new(ppr),
            cache: ResultCache::new(cache),
        }
    }

    pub fn engine(&self) -> &PprEngine {
        &self.engine
    }

    /// Drop cached walks for a tenant whose index changed.
    pub fn invalidate_tenant(&self, tenant: &TenantId) {
        self.cache.invalidate_tenant(tenant);
    }

    /// Walk from `seeds`, returning up to `top_k` passages.
    ///
    /// An empty neighborhood or a seed set with nothing in the graph yields an
    /// empty outcome. Store failures propagate, and an expansion that overruns
    /// `expansion_timeout_ms` fails with [`StrandError::Timeout`].
    pub async fn walk(
        &self,
        ctx: &QueryContext<'_>,
        seeds: &[SeedCandidate],
        top_k: usize,
        cancel: &CancellationToken,
    ) -> StrandResult<WalkOutcome> {
        let seeds: Vec<SeedCandidate> = seeds
            .iter()
            .filter(|s| &s.tenant_id == ctx.tenant)
            .cloned()
            .collect();
        if seeds.is_empty() || top_k == 0 {
            return Ok(WalkOutcome::default());
        }

        let key = self.cache_key(ctx, &seeds, top_k);
        if let Some(cached) = self.cache.get(&key) {
            let mut outcome = (*cached).clone();
            outcome.cache_hit = true;
            return Ok(outcome);
        }

        let config = self.engine.config();
        let seed_ids: Vec<String> = seeds.iter().map(|s| s.node_id.clone()).collect();
        let expansion = ctx.store.expand_neighborhood(
            ctx.tenant,
            &seed_ids,
            config.expansion_hops,
            config.expansion_max_nodes,
        );
        let mut subgraph =
            match tokio::time::timeout(Duration::from_millis(config.expansion_timeout_ms), expansion)
                .await
            {
                Ok(result) => result?,
                Err(_) => {
                    return Err(StrandError::Timeout {
                        operation: "walk:expand_neighborhood".to_string(),
                        timeout_ms: config.expansion_timeout_ms,
                    })
                }
            };
        let dropped = subgraph.retain_tenant(ctx.tenant);
        if dropped > 0 {
            events::tenant_violation(ctx.tenant.as_str(), "<foreign>", "walk:expand_neighborhood");
        }
        if subgraph.is_empty() {
            return Ok(WalkOutcome::default());
        }

        let graph = Arc::new(UnifiedGraph::from_subgraph(ctx.tenant, &subgraph));
        let span = ppr_span!(graph.node_count(), seeds.len());
        let ranking = match self
            .engine
            .run(graph.clone(), seeds, cancel.clone())
            .instrument(span)
            .await
        {
            Ok(ranking) => ranking,
            Err(StrandError::RetrievalError(RetrievalError::InvalidSeeds { reason })) => {
                warn!(tenant = %ctx.tenant, reason = %reason, "no walkable seeds");
                return Ok(WalkOutcome::default());
            }
            Err(e) => return Err(e),
        };

        let nodes: HashMap<&str, &Node> =
            subgraph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        let evidence: Vec<EvidenceItem> = ranking
            .passages()
            .filter_map(|ranked| nodes.get(ranked.node_id.as_str()).map(|n| (*n, ranked.score)))
            .take(top_k)
            .enumerate()
            .map(|(i, (node, score))| evidence::from_node(node, score, EvidenceSource::GraphWalk, i + 1))
            .collect();

        let outcome = WalkOutcome {
            evidence,
            iterations: ranking.iterations,
            converged: ranking.converged,
            damping: ranking.damping,
            node_count: graph.node_count(),
            cache_hit: false,
        };
        self.cache.insert(key, Arc::new(outcome.clone()));
        Ok(outcome)
    }

    fn cache_key(&self, ctx: &QueryContext<'_>, seeds: &[SeedCandidate], top_k: usize) -> CacheKey {
        let mut parts: Vec<String> = seeds
            .iter()
            .map(|s| format!("{}={:.9}", s.node_id, s.weight))
            .collect();
        parts.sort();
        parts.push(format!("top_k={top_k}"));
        let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        CacheKey::new(ctx.tenant, ctx.version, &refs)
    }
}
