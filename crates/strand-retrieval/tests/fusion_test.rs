//! Hybrid lexical + vector search with RRF fusion.

use strand_core::config::FusionConfig;
use strand_core::models::{EvidenceSource, IndexVersion, Node, TenantId};
use strand_retrieval::{HybridSearcher, QueryContext};
use test_fixtures::{graph_store, HashEmbedder, InMemoryGraphStore};

fn ctx<'a>(
    tenant: &'a TenantId,
    store: &'a InMemoryGraphStore,
    embedder: &'a HashEmbedder,
) -> QueryContext<'a> {
    QueryContext {
        tenant,
        version: IndexVersion(1),
        store,
        embedder,
        llm: None,
        embed_timeout_ms: 1_000,
    }
}

#[tokio::test]
async fn both_sides_fuse_into_passages_only() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), TenantId::new("acme"));
    let searcher = HybridSearcher::new(FusionConfig::default());

    let outcome = searcher
        .search(&ctx(&tenant, &store, &embedder), "Rocket Skates sales", 3)
        .await;

    assert!(outcome.failures.is_empty());
    assert!(!outcome.passages.is_empty());
    assert!(outcome.passages.len() <= 3);
    let top: Vec<&str> = outcome.passages[..2]
        .iter()
        .map(|p| p.node.id.as_str())
        .collect();
    assert!(top.contains(&"p4"));
    assert!(top.contains(&"p5"));
    assert!(outcome.passages.iter().all(|p| p.node.is_passage()));

    let evidence = outcome.to_evidence(EvidenceSource::Fusion);
    assert_eq!(evidence[0].citation.rank, 1);
    assert!(evidence.iter().all(|e| e.tenant_id == tenant));
    assert!(evidence.iter().all(|e| e.citation.document_id.is_some()));
}

#[tokio::test]
async fn failed_vector_side_degrades_to_lexical() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), TenantId::new("acme"));
    embedder.set_failing(true);
    let searcher = HybridSearcher::new(FusionConfig::default());

    let outcome = searcher
        .search(&ctx(&tenant, &store, &embedder), "Rocket Skates sales", 5)
        .await;

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].unit, "fusion:vector");
    assert_eq!(outcome.passages.len(), 3);
}

#[tokio::test]
async fn failed_lexical_side_degrades_to_vector() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), TenantId::new("acme"));
    store.fail_method("search_full_text", "fts offline");
    let searcher = HybridSearcher::new(FusionConfig::default());

    let outcome = searcher
        .search(&ctx(&tenant, &store, &embedder), "Rocket Skates sales", 5)
        .await;

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].unit, "fusion:lexical");
    assert!(outcome.passages.iter().any(|p| p.node.id == "p4"));
}

#[tokio::test]
async fn both_sides_failing_yields_empty() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), TenantId::new("acme"));
    store.set_unavailable(true);
    embedder.set_failing(true);
    let searcher = HybridSearcher::new(FusionConfig::default());

    let outcome = searcher
        .search(&ctx(&tenant, &store, &embedder), "Rocket Skates", 5)
        .await;

    assert!(outcome.passages.is_empty());
    assert_eq!(outcome.failures.len(), 2);
}

#[tokio::test]
async fn foreign_passages_are_filtered() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), TenantId::new("acme"));
    store.leak_foreign(Node::passage(
        "x-leak",
        TenantId::new("globex"),
        "Leak",
        "Rocket Skates sales figures",
    ));
    let searcher = HybridSearcher::new(FusionConfig::default());

    let outcome = searcher
        .search(&ctx(&tenant, &store, &embedder), "Rocket Skates sales", 10)
        .await;

    assert!(!outcome.passages.is_empty());
    assert!(outcome.passages.iter().all(|p| p.node.tenant_id == tenant));
}
