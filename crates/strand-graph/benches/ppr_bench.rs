use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strand_core::config::PprConfig;
use strand_core::models::{Edge, Node, SeedCandidate, SeedTier, Subgraph, TenantId};
use strand_graph::{PprEngine, UnifiedGraph};

fn ring_with_chords(size: usize) -> UnifiedGraph {
    let t = TenantId::new("bench");
    let nodes = (0..size)
        .map(|i| Node::passage(format!("n{i}"), t.clone(), format!("P{i}"), ""))
        .collect();
    let mut edges = Vec::new();
    for i in 0..size {
        edges.extend(Edge::bidirectional(&format!("n{i}"), &format!("n{}", (i + 1) % size), "next", 1.0, &t));
        edges.extend(Edge::bidirectional(&format!("n{i}"), &format!("n{}", (i * 7 + 3) % size), "chord", 0.5, &t));
    }
    UnifiedGraph::from_subgraph(&t, &Subgraph { nodes, edges })
}

fn bench_ppr(c: &mut Criterion) {
    let engine = PprEngine::new(PprConfig::default());
    let seeds: Vec<SeedCandidate> = (0..4)
        .map(|i| SeedCandidate {
            node_id: format!("n{i}"),
            tenant_id: TenantId::new("bench"),
            weight: 1.0,
            tier: SeedTier::ExactName,
            strategy: "exact_name".to_string(),
            term: format!("t{i}"),
        })
        .collect();

    for size in [500usize, 5_000] {
        let graph = ring_with_chords(size);
        c.bench_function(&format!("ppr_{size}_nodes"), |b| {
            b.iter(|| engine.rank(black_box(&graph), black_box(&seeds)))
        });
    }
}

criterion_group!(benches, bench_ppr);
criterion_main!(benches);
