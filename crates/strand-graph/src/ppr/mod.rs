//! Personalized pagerank over a [`UnifiedGraph`].
//!
//! Seeds are re-normalized into a restart distribution, the damping factor is
//! adjusted for tiny or sparse seed sets, and power iteration runs until the
//! L1 change falls under epsilon or the iteration cap is reached.

pub mod damping;
pub mod iteration;

use std::collections::BTreeMap;
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use strand_core::config::PprConfig;
use strand_core::errors::{RetrievalError, StrandError, StrandResult};
use strand_core::models::{NodeClass, SeedCandidate};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::graph::{Transition, UnifiedGraph};
use iteration::{power_iterate, IterationParams};

/// A node with its stationary probability.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNode {
    pub node_id: String,
    pub class: NodeClass,
    pub score: f64,
}

/// Full PPR output. `nodes` covers every graph node, sorted by score
/// descending then node id, and sums to 1.
#[derive(Debug, Clone)]
pub struct PprRanking {
    pub nodes: Vec<RankedNode>,
    pub iterations: usize,
    pub converged: bool,
    pub damping: f64,
    pub final_delta: f64,
    /// Seeds that were not present in the graph.
    pub dropped_seeds: Vec<String>,
}

impl PprRanking {
    /// Passage nodes with positive mass, best first. Entities are traversal
    /// infrastructure and are never evidence.
    pub fn passages(&self) -> impl Iterator<Item = &RankedNode> {
        self.nodes
            .iter()
            .filter(|n| n.class == NodeClass::Passage && n.score > 0.0)
    }

    pub fn total_mass(&self) -> f64 {
        self.nodes.iter().map(|n| n.score).sum()
    }

    pub fn score_of(&self, node_id: &str) -> Option<f64> {
        self.nodes
            .iter()
            .find(|n| n.node_id == node_id)
            .map(|n| n.score)
    }

    /// 0-based position of a node in the ranking.
    pub fn position(&self, node_id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.node_id == node_id)
    }
}

/// Personalized pagerank engine.
#[derive(Debug, Clone)]
pub struct PprEngine {
    config: PprConfig,
}

impl PprEngine {
    pub fn new(config: PprConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PprConfig {
        &self.config
    }

    /// Rank synchronously. Fails with `InvalidSeeds` when no seed with positive
    /// weight is present in the graph.
    pub fn rank(&self, graph: &UnifiedGraph, seeds: &[SeedCandidate]) -> StrandResult<PprRanking> {
        self.rank_inner(graph, seeds, &|| false)
    }

    /// Rank synchronously, checking `cancel` between iterations.
    pub fn rank_with_cancel(
        &self,
        graph: &UnifiedGraph,
        seeds: &[SeedCandidate],
        cancel: &CancellationToken,
    ) -> StrandResult<PprRanking> {
        self.rank_inner(graph, seeds, &|| cancel.is_cancelled())
    }

    /// Rank on tokio's blocking pool.
    pub async fn run(
        &self,
        graph: Arc<UnifiedGraph>,
        seeds: Vec<SeedCandidate>,
        cancel: CancellationToken,
    ) -> StrandResult<PprRanking> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.rank_with_cancel(&graph, &seeds, &cancel))
            .await
            .map_err(|e| {
                StrandError::RetrievalError(RetrievalError::WalkFailed {
                    reason: format!("ppr task failed: {e}"),
                })
            })?
    }

    fn rank_inner(
        &self,
        graph: &UnifiedGraph,
        seeds: &[SeedCandidate],
        is_cancelled: &dyn Fn() -> bool,
    ) -> StrandResult<PprRanking> {
        let (seed_vec, seed_nodes, dropped) = self.seed_distribution(graph, seeds)?;

        let mean_degree = if seed_nodes.is_empty() {
            0.0
        } else {
            seed_nodes.iter().map(|idx| graph.out_degree(*idx)).sum::<usize>() as f64
                / seed_nodes.len() as f64
        };
        let d = damping::effective_damping(&self.config, seed_nodes.len(), mean_degree);

        let transition = Transition::build(graph);
        let params = IterationParams {
            damping: d,
            epsilon: self.config.epsilon,
            max_iterations: self.config.max_iterations,
            parallel: graph.node_count() >= self.config.parallel_threshold,
        };
        let outcome = power_iterate(&transition, &seed_vec, params, is_cancelled)?;

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            seeds = seed_nodes.len(),
            damping = d,
            iterations = outcome.iterations,
            converged = outcome.converged,
            "ppr complete"
        );

        let mut nodes: Vec<RankedNode> = graph
            .graph
            .node_indices()
            .map(|idx| {
                let node = graph.node(idx);
                RankedNode {
                    node_id: node.node_id.clone(),
                    class: node.class,
                    score: outcome.scores[idx.index()],
                }
            })
            .collect();
        nodes.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.node_id.cmp(&b.node_id)));

        Ok(PprRanking {
            nodes,
            iterations: outcome.iterations,
            converged: outcome.converged,
            damping: d,
            final_delta: outcome.final_delta,
            dropped_seeds: dropped,
        })
    }

    /// Restart vector summing to 1, the distinct seed nodes, and the ids of
    /// seeds absent from the graph.
    fn seed_distribution(
        &self,
        graph: &UnifiedGraph,
        seeds: &[SeedCandidate],
    ) -> StrandResult<(Vec<f64>, Vec<NodeIndex>, Vec<String>)> {
        let mut weights: BTreeMap<NodeIndex, f64> = BTreeMap::new();
        let mut dropped = Vec::new();

        for seed in seeds {
            if &seed.tenant_id != graph.tenant() {
                warn!(
                    node_id = %seed.node_id,
                    expected = %graph.tenant(),
                    found = %seed.tenant_id,
                    "dropping foreign-tenant seed"
                );
                continue;
            }
            if !seed.weight.is_finite() || seed.weight <= 0.0 {
                continue;
            }
            match graph.get_node(&seed.node_id) {
                Some(idx) => *weights.entry(idx).or_default() += seed.weight,
                None => {
                    warn!(node_id = %seed.node_id, "seed not present in graph, dropped");
                    dropped.push(seed.node_id.clone());
                }
            }
        }

        let total: f64 = weights.values().sum();
        if weights.is_empty() || total <= 0.0 {
            return Err(RetrievalError::InvalidSeeds {
                reason: "no seed with positive weight is present in the graph".to_string(),
            }
            .into());
        }

        let mut seed_vec = vec![0.0; graph.node_count()];
        for (idx, w) in &weights {
            seed_vec[idx.index()] = w / total;
        }
        Ok((seed_vec, weights.into_keys().collect(), dropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_core::models::{Edge, Node, SeedTier, Subgraph, TenantId};

    fn seed(id: &str, tenant: &TenantId, weight: f64) -> SeedCandidate {
        SeedCandidate {
            node_id: id.to_string(),
            tenant_id: tenant.clone(),
            weight,
            tier: SeedTier::ExactName,
            strategy: "exact_name".to_string(),
            term: id.to_string(),
        }
    }

    fn triangle(t: &TenantId) -> UnifiedGraph {
        let mut edges = Vec::new();
        edges.extend(Edge::bidirectional("a", "b", "r", 1.0, t));
        edges.extend(Edge::bidirectional("b", "p", "mentions", 1.0, t));
        UnifiedGraph::from_subgraph(
            t,
            &Subgraph {
                nodes: vec![
                    Node::entity("a", t.clone(), "A"),
                    Node::entity("b", t.clone(), "B"),
                    Node::passage("p", t.clone(), "P", "text"),
                ],
                edges,
            },
        )
    }

    #[test]
    fn missing_seeds_are_dropped() {
        let t = TenantId::new("t");
        let graph = triangle(&t);
        let engine = PprEngine::new(PprConfig::default());
        let ranking = engine
            .rank(&graph, &[seed("a", &t, 1.0), seed("ghost", &t, 1.0)])
            .unwrap();
        assert_eq!(ranking.dropped_seeds, vec!["ghost".to_string()]);
        assert!((ranking.total_mass() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn no_usable_seed_is_an_error() {
        let t = TenantId::new("t");
        let graph = triangle(&t);
        let engine = PprEngine::new(PprConfig::default());
        let err = engine.rank(&graph, &[seed("ghost", &t, 1.0)]).unwrap_err();
        assert!(matches!(
            err,
            StrandError::RetrievalError(RetrievalError::InvalidSeeds { .. })
        ));
    }

    #[test]
    fn foreign_seeds_are_ignored() {
        let t = TenantId::new("t");
        let other = TenantId::new("other");
        let graph = triangle(&t);
        let engine = PprEngine::new(PprConfig::default());
        let err = engine.rank(&graph, &[seed("a", &other, 1.0)]).unwrap_err();
        assert!(matches!(err, StrandError::RetrievalError(_)));
    }

    #[test]
    fn passages_exclude_entities() {
        let t = TenantId::new("t");
        let graph = triangle(&t);
        let engine = PprEngine::new(PprConfig::default());
        let ranking = engine.rank(&graph, &[seed("a", &t, 1.0)]).unwrap();
        let ids: Vec<&str> = ranking.passages().map(|n| n.node_id.as_str()).collect();
        assert_eq!(ids, vec!["p"]);
    }

    #[test]
    fn cancelled_token_stops_ranking() {
        let t = TenantId::new("t");
        let graph = triangle(&t);
        let engine = PprEngine::new(PprConfig::default());
        let token = CancellationToken::new();
        token.cancel();
        let err = engine
            .rank_with_cancel(&graph, &[seed("a", &t, 1.0)], &token)
            .unwrap_err();
        assert!(matches!(err, StrandError::Cancelled));
    }
}
