//! Post-fusion authority boost.
//!
//! Applied as a multiplier on the fused score after RRF, never folded into the
//! per-list ranks.

use std::collections::HashMap;

use strand_core::config::FusionConfig;
use strand_core::constants::{META_LEVEL, SUMMARY_LEVEL};
use strand_core::models::Node;

use super::rrf::FusedCandidate;

/// A fused passage with its boosted score.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostedPassage {
    pub node: Node,
    pub rrf_score: f64,
    pub score: f64,
}

/// Multiplier for one node: importance share plus a flat bonus for
/// summary-level passages.
pub fn authority_multiplier(node: &Node, config: &FusionConfig) -> f64 {
    let importance = if node.importance.is_finite() {
        node.importance.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let summary = node
        .metadata
        .get(META_LEVEL)
        .is_some_and(|level| level == SUMMARY_LEVEL);
    1.0 + config.authority_boost * importance + if summary { config.summary_boost } else { 0.0 }
}

/// Boost fused candidates and stable re-sort by boosted score. Candidates
/// without a node in `nodes` are dropped.
pub fn apply_authority_boost(
    fused: Vec<FusedCandidate>,
    nodes: &HashMap<String, Node>,
    config: &FusionConfig,
) -> Vec<BoostedPassage> {
    let mut boosted: Vec<BoostedPassage> = fused
        .into_iter()
        .filter_map(|candidate| {
            nodes.get(&candidate.node_id).map(|node| BoostedPassage {
                score: candidate.rrf_score * authority_multiplier(node, config),
                rrf_score: candidate.rrf_score,
                node: node.clone(),
            })
        })
        .collect();
    boosted.sort_by(|a, b| b.score.total_cmp(&a.score));
    boosted
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_core::models::TenantId;

    fn passage(id: &str, importance: f64, summary: bool) -> Node {
        let mut node = Node::passage(id, TenantId::new("t"), id, "");
        node.importance = importance;
        if summary {
            node.metadata.insert(META_LEVEL.into(), SUMMARY_LEVEL.into());
        }
        node
    }

    fn fused(id: &str, score: f64) -> FusedCandidate {
        FusedCandidate {
            node_id: id.into(),
            rrf_score: score,
            lexical_rank: Some(1),
            vector_rank: None,
        }
    }

    #[test]
    fn summary_passage_overtakes_close_neighbour() {
        let config = FusionConfig::default();
        let nodes: HashMap<String, Node> = [
            ("a".to_string(), passage("a", 0.0, false)),
            ("b".to_string(), passage("b", 0.0, true)),
        ]
        .into_iter()
        .collect();
        let out = apply_authority_boost(vec![fused("a", 0.0164), fused("b", 0.0161)], &nodes, &config);
        assert_eq!(out[0].node.id, "b");
        assert!((out[0].rrf_score - 0.0161).abs() < 1e-12);
    }

    #[test]
    fn equal_boosts_preserve_fused_order() {
        let config = FusionConfig::default();
        let nodes: HashMap<String, Node> = [
            ("a".to_string(), passage("a", 0.5, false)),
            ("b".to_string(), passage("b", 0.5, false)),
        ]
        .into_iter()
        .collect();
        let out = apply_authority_boost(vec![fused("a", 0.01), fused("b", 0.01)], &nodes, &config);
        assert_eq!(out[0].node.id, "a");
        assert_eq!(out[1].node.id, "b");
    }

    #[test]
    fn unknown_nodes_dropped() {
        let out = apply_authority_boost(vec![fused("ghost", 1.0)], &HashMap::new(), &FusionConfig::default());
        assert!(out.is_empty());
    }
}
