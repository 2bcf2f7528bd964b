//! Seed resolution against the fixture graphs.

use strand_core::config::{ProbeMode, SeedConfig};
use strand_core::models::{IndexVersion, SeedStatus, SeedTier, TenantId};
use strand_retrieval::{QueryContext, SeedResolver};
use test_fixtures::{graph_store, HashEmbedder, InMemoryGraphStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

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

fn acme() -> TenantId {
    TenantId::new("acme")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn exact_name_resolves_at_tier_one_and_skips_vector() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), acme());
    let resolver = SeedResolver::new(SeedConfig::default());

    let resolution = resolver
        .resolve(&ctx(&tenant, &store, &embedder), "Tell me about Acme Corp")
        .await;

    assert_eq!(resolution.status, SeedStatus::Resolved);
    assert_eq!(resolution.terms, vec!["Acme Corp"]);
    assert_eq!(resolution.seeds.len(), 1);
    let seed = &resolution.seeds[0];
    assert_eq!(seed.node_id, "e-acme");
    assert_eq!(seed.tier, SeedTier::ExactName);
    assert_eq!(seed.weight, 1.0);
    assert!(resolution.unmatched_terms.is_empty());
    assert_eq!(resolution.tier_for_term("Acme Corp"), Some(SeedTier::ExactName));

    assert_eq!(embedder.calls(), 0, "resolved terms must never be embedded");
    assert_eq!(store.calls("search_vector"), 0);
}

#[tokio::test]
async fn alias_tier_weight_applies() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), acme());
    let resolver = SeedResolver::new(SeedConfig::default());

    let resolution = resolver
        .resolve(&ctx(&tenant, &store, &embedder), "What does ACME do?")
        .await;

    assert_eq!(resolution.seeds.len(), 1);
    assert_eq!(resolution.seeds[0].node_id, "e-acme");
    assert_eq!(resolution.seeds[0].tier, SeedTier::Alias);
    assert_eq!(resolution.seeds[0].weight, SeedConfig::default().alias_weight);
}

#[tokio::test]
async fn unknown_terms_reach_vector_fallback_and_are_reported() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), acme());
    let resolver = SeedResolver::new(SeedConfig::default());

    let resolution = resolver
        .resolve(&ctx(&tenant, &store, &embedder), "Acme Corp and Zorblax")
        .await;

    assert!(embedder.was_embedded("Zorblax"));
    assert!(!embedder.was_embedded("Acme Corp"));
    assert!(resolution.seeds.iter().any(|s| s.node_id == "e-acme"));
    assert_eq!(resolution.tier_for_term("Acme Corp"), Some(SeedTier::ExactName));
}

#[tokio::test]
async fn failed_tier_is_recorded_and_later_tiers_still_run() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), acme());
    store.fail_method("find_by_alias", "alias index corrupt");
    let resolver = SeedResolver::new(SeedConfig::default());

    let resolution = resolver
        .resolve(&ctx(&tenant, &store, &embedder), "What does ACME do?")
        .await;

    assert!(resolution
        .failures
        .iter()
        .any(|f| f.unit == "seed_tier:alias"));
    assert_eq!(resolution.seeds.len(), 1);
    assert_eq!(resolution.seeds[0].node_id, "e-acme");
    assert_eq!(resolution.seeds[0].tier, SeedTier::Fuzzy);
}

#[tokio::test]
async fn speculative_probing_matches_sequential() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), acme());
    let query = "How did Jane Doe and Rocket Skates relate to ACME?";

    let sequential = SeedResolver::new(SeedConfig::default())
        .resolve(&ctx(&tenant, &store, &embedder), query)
        .await;
    let speculative = SeedResolver::new(SeedConfig {
        probe_mode: ProbeMode::Speculative,
        ..SeedConfig::default()
    })
    .resolve(&ctx(&tenant, &store, &embedder), query)
    .await;

    assert_eq!(sequential.seeds, speculative.seeds);
    assert_eq!(sequential.unmatched_terms, speculative.unmatched_terms);
    assert_eq!(sequential.per_tier, speculative.per_tier);
}

#[tokio::test]
async fn same_name_in_another_tenant_is_never_returned() {
    let (store, embedder) = (graph_store(), HashEmbedder::new());
    let globex = TenantId::new("globex");
    let resolver = SeedResolver::new(SeedConfig::default());

    let resolution = resolver
        .resolve(&ctx(&globex, &store, &embedder), "Tell me about Acme Corp")
        .await;

    assert_eq!(resolution.seeds.len(), 1);
    assert_eq!(resolution.seeds[0].node_id, "g-acme");
    assert!(resolution.seeds.iter().all(|s| s.tenant_id == globex));
}

#[tokio::test]
async fn empty_query_has_no_seeds_and_touches_nothing() {
    let (store, embedder, tenant) = (graph_store(), HashEmbedder::new(), acme());
    let resolver = SeedResolver::new(SeedConfig::default());

    let resolution = resolver
        .resolve(&ctx(&tenant, &store, &embedder), "what is the")
        .await;

    assert!(resolution.is_no_seeds());
    assert!(resolution.terms.is_empty());
    assert_eq!(store.total_calls(), 0);
    assert_eq!(embedder.calls(), 0);
}
