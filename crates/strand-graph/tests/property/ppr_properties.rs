//! Property tests for PPR: mass conservation and ordering.

use proptest::prelude::*;
use strand_core::config::PprConfig;
use strand_core::models::{Edge, Node, SeedCandidate, SeedTier, Subgraph, TenantId};
use strand_graph::{PprEngine, UnifiedGraph};

fn build(node_count: usize, edges: &[(usize, usize, f64)]) -> UnifiedGraph {
    let t = TenantId::new("prop");
    let nodes = (0..node_count)
        .map(|i| {
            if i % 2 == 0 {
                Node::entity(format!("n{i:03}"), t.clone(), format!("E{i}"))
            } else {
                Node::passage(format!("n{i:03}"), t.clone(), format!("P{i}"), "text")
            }
        })
        .collect();
    let edges = edges
        .iter()
        .filter(|(a, b, _)| *a < node_count && *b < node_count)
        .flat_map(|(a, b, w)| Edge::bidirectional(&format!("n{a:03}"), &format!("n{b:03}"), "r", *w, &t))
        .collect();
    UnifiedGraph::from_subgraph(&t, &Subgraph { nodes, edges })
}

fn seeds(ids: &[(usize, f64)], node_count: usize) -> Vec<SeedCandidate> {
    ids.iter()
        .filter(|(i, _)| *i < node_count)
        .map(|(i, w)| SeedCandidate {
            node_id: format!("n{i:03}"),
            tenant_id: TenantId::new("prop"),
            weight: *w,
            tier: SeedTier::FullText,
            strategy: "full_text".to_string(),
            term: "t".to_string(),
        })
        .collect()
}

proptest! {
    #[test]
    fn ppr_sums_to_one(
        node_count in 1usize..40,
        edges in prop::collection::vec((0usize..40, 0usize..40, 0.01f64..5.0), 0..80),
        seed_ids in prop::collection::vec((0usize..40, 0.01f64..1.0), 1..6),
        max_iterations in 1usize..30,
    ) {
        let graph = build(node_count, &edges);
        let mut seeds = seeds(&seed_ids, node_count);
        if seeds.is_empty() {
            seeds = self::seeds(&[(0, 1.0)], node_count);
        }
        let engine = PprEngine::new(PprConfig { max_iterations, ..PprConfig::default() });
        let ranking = engine.rank(&graph, &seeds).unwrap();

        prop_assert!((ranking.total_mass() - 1.0).abs() < 1e-6);
        prop_assert!(ranking.iterations <= max_iterations);
        prop_assert!(ranking.nodes.iter().all(|n| n.score >= 0.0));
    }

    #[test]
    fn ranking_sorted_by_score_then_id(
        node_count in 2usize..30,
        edges in prop::collection::vec((0usize..30, 0usize..30, 0.1f64..2.0), 0..50),
    ) {
        let graph = build(node_count, &edges);
        let engine = PprEngine::new(PprConfig::default());
        let ranking = engine.rank(&graph, &seeds(&[(0, 1.0)], node_count)).unwrap();
        for pair in ranking.nodes.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].node_id < pair[1].node_id)
            );
        }
    }
}
