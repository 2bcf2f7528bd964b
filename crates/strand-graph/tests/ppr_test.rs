//! Integration tests for the PPR engine.

use std::sync::Arc;

use strand_core::config::PprConfig;
use strand_core::models::{Edge, Node, NodeClass, SeedCandidate, SeedTier, Subgraph, TenantId};
use strand_graph::{PprEngine, UnifiedGraph};
use tokio_util::sync::CancellationToken;

fn tenant() -> TenantId {
    TenantId::new("acme-tenant")
}

fn seed(id: &str, weight: f64) -> SeedCandidate {
    SeedCandidate {
        node_id: id.to_string(),
        tenant_id: tenant(),
        weight,
        tier: SeedTier::ExactName,
        strategy: "exact_name".to_string(),
        term: id.to_string(),
    }
}

/// Acme Corp is linked to Passage1 via Jane Doe; Globex and Passage2 form a
/// separate component, and "lonely" has no edges at all.
fn acme_graph() -> UnifiedGraph {
    let t = tenant();
    let mut edges = Vec::new();
    edges.extend(Edge::bidirectional("acme", "jane", "employs", 1.0, &t));
    edges.extend(Edge::bidirectional("acme", "passage1", "mentioned_in", 1.0, &t));
    edges.extend(Edge::bidirectional("jane", "passage1", "mentioned_in", 0.5, &t));
    edges.extend(Edge::bidirectional("globex", "passage2", "mentioned_in", 1.0, &t));

    let subgraph = Subgraph {
        nodes: vec![
            Node::entity("acme", t.clone(), "Acme Corp"),
            Node::entity("jane", t.clone(), "Jane Doe"),
            Node::entity("globex", t.clone(), "Globex"),
            Node::passage("passage1", t.clone(), "Passage1", "Acme Corp hired Jane Doe in 2019."),
            Node::passage("passage2", t.clone(), "Passage2", "Globex opened a new plant."),
            Node::passage("lonely", t.clone(), "Lonely", "Unrelated note."),
        ],
        edges,
    };
    UnifiedGraph::from_subgraph(&t, &subgraph)
}

#[test]
fn acme_seed_ranks_passage1_above_unreachable_nodes() {
    let graph = acme_graph();
    let engine = PprEngine::new(PprConfig::default());
    let ranking = engine.rank(&graph, &[seed("acme", 1.0)]).unwrap();

    let p1 = ranking.score_of("passage1").unwrap();
    let p2 = ranking.score_of("passage2").unwrap();
    let lonely = ranking.score_of("lonely").unwrap();
    assert!(p1 > 0.0);
    assert_eq!(p2, 0.0);
    assert_eq!(lonely, 0.0);
    assert!(ranking.position("passage1") < ranking.position("passage2"));

    let first_passage = ranking.passages().next().unwrap();
    assert_eq!(first_passage.node_id, "passage1");
    assert_eq!(first_passage.class, NodeClass::Passage);
}

#[test]
fn mass_sums_to_one_with_isolated_nodes() {
    let graph = acme_graph();
    let engine = PprEngine::new(PprConfig::default());

    for seeds in [
        vec![seed("acme", 1.0)],
        vec![seed("lonely", 1.0)],
        vec![seed("acme", 0.5), seed("globex", 0.25), seed("lonely", 0.25)],
    ] {
        let ranking = engine.rank(&graph, &seeds).unwrap();
        assert!((ranking.total_mass() - 1.0).abs() < 1e-6);
        assert_eq!(ranking.nodes.len(), graph.node_count());
    }
}

#[test]
fn isolated_seed_keeps_all_its_mass() {
    let graph = acme_graph();
    let engine = PprEngine::new(PprConfig::default());
    let ranking = engine.rank(&graph, &[seed("lonely", 1.0)]).unwrap();
    assert!((ranking.score_of("lonely").unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn ranking_is_deterministic() {
    let engine = PprEngine::new(PprConfig::default());
    let seeds = [seed("acme", 1.0), seed("globex", 0.6)];
    let first = engine.rank(&acme_graph(), &seeds).unwrap();
    let second = engine.rank(&acme_graph(), &seeds).unwrap();
    assert_eq!(first.nodes, second.nodes);
    assert_eq!(first.iterations, second.iterations);
}

#[test]
fn iteration_cap_always_wins() {
    let engine = PprEngine::new(PprConfig {
        max_iterations: 2,
        epsilon: 1e-15,
        ..PprConfig::default()
    });
    let ranking = engine.rank(&acme_graph(), &[seed("acme", 1.0)]).unwrap();
    assert_eq!(ranking.iterations, 2);
    assert!(!ranking.converged);
    assert!((ranking.total_mass() - 1.0).abs() < 1e-6);
}

#[test]
fn single_seed_lowers_damping() {
    let config = PprConfig::default();
    let engine = PprEngine::new(config.clone());
    let ranking = engine.rank(&acme_graph(), &[seed("acme", 1.0)]).unwrap();
    assert!(ranking.damping < config.damping);
    assert!(ranking.damping >= config.min_damping);
}

#[tokio::test]
async fn run_on_blocking_pool() {
    let engine = PprEngine::new(PprConfig::default());
    let graph = Arc::new(acme_graph());
    let ranking = engine
        .run(graph, vec![seed("acme", 1.0)], CancellationToken::new())
        .await
        .unwrap();
    assert!(ranking.score_of("passage1").unwrap() > 0.0);
}

#[tokio::test]
async fn run_honours_cancellation() {
    let engine = PprEngine::new(PprConfig::default());
    let token = CancellationToken::new();
    token.cancel();
    let result = engine
        .run(Arc::new(acme_graph()), vec![seed("acme", 1.0)], token)
        .await;
    assert!(matches!(result, Err(strand_core::StrandError::Cancelled)));
}
