//! Orchestrator behavior across routes, failure modes and cache invalidation.

use std::sync::Arc;
use std::time::Duration;

use strand_core::errors::{ErrorKind, StrandError};
use strand_core::models::{
    DriftTermination, EvidenceSource, FailureKind, IndexVersion, NotFoundReason, QueryOptions,
    QueryStatus, Route, RouteSource, SeedCandidate, SeedTier, TenantId,
};
use strand_core::StrandConfig;
use strand_retrieval::Orchestrator;
use test_fixtures::{
    graph_store, HashEmbedder, InMemoryGraphStore, RecordingAnswerGenerator,
    StaticCommunityProvider,
};
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    store: Arc<InMemoryGraphStore>,
    generator: Arc<RecordingAnswerGenerator>,
    orchestrator: Orchestrator,
}

fn harness() -> Harness {
    harness_with(StrandConfig::default(), None)
}

fn harness_with(config: StrandConfig, community: Option<Arc<StaticCommunityProvider>>) -> Harness {
    let store = Arc::new(graph_store());
    let generator = Arc::new(RecordingAnswerGenerator::new());
    let mut builder = Orchestrator::builder(config)
        .graph_store(store.clone())
        .embedding_service(Arc::new(HashEmbedder::new()))
        .answer_generator(generator.clone());
    if let Some(community) = community {
        builder = builder.community_provider(community);
    }
    Harness {
        store,
        generator,
        orchestrator: builder.build().unwrap(),
    }
}

fn acme() -> TenantId {
    TenantId::new("acme")
}

fn candidate(id: &str, tenant: &str, weight: f64) -> SeedCandidate {
    SeedCandidate {
        node_id: id.to_string(),
        tenant_id: TenantId::new(tenant),
        weight,
        tier: SeedTier::Community,
        strategy: "static".to_string(),
        term: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn entity_question_walks_from_the_entity() {
    let h = harness();

    let result = h
        .orchestrator
        .query("What products does Acme Corp sell?", &acme(), QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(result.route_used, Route::EntityFocused);
    assert_eq!(result.route_decision.source, RouteSource::Heuristic);
    assert_eq!(result.status, QueryStatus::Found);
    assert!(result.evidence.iter().any(|e| e.passage_id == "p1"));
    assert!(result.evidence.iter().all(|e| e.passage_id != "p3"));
    assert!(result.evidence.iter().all(|e| e.tenant_id == acme()));
    assert!(result
        .evidence
        .iter()
        .all(|e| e.citation.source == EvidenceSource::GraphWalk));
    for (i, item) in result.evidence.iter().enumerate() {
        assert_eq!(item.citation.rank, i + 1);
    }

    let diag = &result.diagnostics;
    assert_eq!(diag.seeds_per_tier.get(&SeedTier::ExactName), Some(&1));
    assert_eq!(diag.index_version, Some(IndexVersion(1)));
    assert!(diag.ppr_iterations.is_some());
    assert!(diag.generator_invoked);
    assert_eq!(diag.evidence_count, result.evidence.len());

    assert_eq!(h.generator.calls(), 1);
    let request = &h.generator.requests()[0];
    assert_eq!(request.route, Route::EntityFocused);
    assert_eq!(request.evidence.len(), result.evidence.len());
    assert!(result.answer.is_some());
}

#[tokio::test]
async fn forced_route_always_wins() {
    let h = harness();

    let result = h
        .orchestrator
        .query(
            "What products does Acme Corp sell?",
            &acme(),
            QueryOptions::default().with_route(Route::FastLookup),
        )
        .await
        .unwrap();

    assert_eq!(result.route_used, Route::FastLookup);
    assert_eq!(result.route_decision.source, RouteSource::Forced);
    assert!(result
        .evidence
        .iter()
        .all(|e| e.citation.source == EvidenceSource::Fusion));
}

#[tokio::test]
async fn zero_seeds_is_not_found_without_generation() {
    let h = harness();

    let result = h
        .orchestrator
        .query(
            "Tell me about Zorblax",
            &acme(),
            QueryOptions::default().with_route(Route::EntityFocused),
        )
        .await
        .unwrap();

    assert_eq!(result.route_used, Route::EntityFocused);
    assert_eq!(
        result.status,
        QueryStatus::NotFound {
            reason: NotFoundReason::NoSeeds
        }
    );
    assert!(result.is_not_found());
    assert!(result.evidence.is_empty());
    assert!(result.answer.is_none());
    assert_eq!(result.diagnostics.unmatched_terms, vec!["Zorblax"]);
    assert!(!result.diagnostics.generator_invoked);
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test]
async fn thematic_route_uses_community_seeds() {
    let provider = Arc::new(StaticCommunityProvider::new().with_seeds(
        &acme(),
        vec![
            candidate("e-rocket", "acme", 0.8),
            candidate("g-hank", "globex", 0.9),
        ],
    ));
    let h = harness_with(StrandConfig::default(), Some(provider.clone()));

    let result = h
        .orchestrator
        .query("What are the main themes?", &acme(), QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(result.route_used, Route::Thematic);
    assert_eq!(result.status, QueryStatus::Found);
    assert_eq!(result.diagnostics.seeds_per_tier.get(&SeedTier::Community), Some(&1));
    assert!(result.evidence.iter().any(|e| e.passage_id == "p4"));
    assert!(result.evidence.iter().all(|e| e.tenant_id == acme()));
    assert_eq!(provider.calls(), 1);

    // Same tenant, version and query: served from the community cache.
    let again = h
        .orchestrator
        .query("What are the main themes?", &acme(), QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(provider.calls(), 1);
    assert!(again.diagnostics.cache_hits >= 1);
}

#[tokio::test]
async fn multi_part_question_runs_drift() {
    let h = harness();

    let result = h
        .orchestrator
        .query(
            "Who leads Acme Corp? What did Rocket Skates sales do?",
            &acme(),
            QueryOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(result.route_used, Route::MultiHop);
    assert_eq!(result.status, QueryStatus::Found);
    let diag = &result.diagnostics;
    assert_eq!(diag.drift_termination, Some(DriftTermination::ConfidenceReached));
    assert_eq!(diag.drift_iterations, Some(1));
    assert_eq!(diag.sub_questions_total, 2);
    assert_eq!(diag.sub_questions_answered, 2);
    assert!(result
        .evidence
        .iter()
        .all(|e| matches!(e.citation.source, EvidenceSource::SubQuestion { .. })));
    assert_eq!(h.generator.requests()[0].route, Route::MultiHop);
}

#[tokio::test]
async fn generate_answer_false_skips_generator() {
    let h = harness();

    let result = h
        .orchestrator
        .query(
            "What products does Acme Corp sell?",
            &acme(),
            QueryOptions {
                generate_answer: false,
                top_k: Some(2),
                ..QueryOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result.status, QueryStatus::Found);
    assert!(result.evidence.len() <= 2);
    assert!(result.answer.is_none());
    assert_eq!(h.generator.calls(), 0);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_store_is_fatal() {
    let h = harness();
    h.store.set_unavailable(true);

    let err = h
        .orchestrator
        .query("What products does Acme Corp sell?", &acme(), QueryOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FatalGraph);
    assert!(err.is_retryable());
    assert_eq!(err.code(), "GRAPH_UNAVAILABLE");
}

#[tokio::test]
async fn query_budget_exhaustion_times_out() {
    let h = harness();
    h.store.set_latency(Duration::from_millis(300));

    let err = h
        .orchestrator
        .query(
            "What products does Acme Corp sell?",
            &acme(),
            QueryOptions {
                timeout_ms: Some(50),
                ..QueryOptions::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(matches!(err, StrandError::Timeout { timeout_ms: 50, .. }));
}

#[tokio::test]
async fn hung_version_check_is_fatal_not_a_budget_timeout() {
    let mut config = StrandConfig::default();
    config.query.store_timeout_ms = 30;
    let h = harness_with(config, None);
    h.store
        .delay_method("index_version", Duration::from_millis(500));

    let err = h
        .orchestrator
        .query("What products does Acme Corp sell?", &acme(), QueryOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FatalGraph);
    assert!(err.is_retryable());
    assert_eq!(err.code(), "GRAPH_UNAVAILABLE");
    assert_eq!(h.store.calls("find_by_name"), 0);
}

#[tokio::test]
async fn hung_expansion_degrades_to_not_found() {
    let mut config = StrandConfig::default();
    config.ppr.expansion_timeout_ms = 30;
    let h = harness_with(config, None);
    h.store
        .delay_method("expand_neighborhood", Duration::from_millis(500));

    let result = h
        .orchestrator
        .query("What products does Acme Corp sell?", &acme(), QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(result.route_used, Route::EntityFocused);
    assert!(result.diagnostics.seed_count > 0);
    assert_eq!(
        result.status,
        QueryStatus::NotFound {
            reason: NotFoundReason::NoEvidence
        }
    );
    assert!(result.evidence.is_empty());
    let failure = result
        .diagnostics
        .partial_failures
        .iter()
        .find(|f| f.unit == "walk")
        .unwrap();
    assert_eq!(failure.kind, FailureKind::Timeout);
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test]
async fn cancelled_query_returns_cancelled() {
    let h = harness();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = h
        .orchestrator
        .query_with_cancellation(
            "What products does Acme Corp sell?",
            &acme(),
            QueryOptions::default(),
            cancel,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test]
async fn failing_generator_leaves_answer_empty() {
    let h = harness();
    h.generator.set_failing(true);

    let result = h
        .orchestrator
        .query("What products does Acme Corp sell?", &acme(), QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(result.status, QueryStatus::Found);
    assert!(!result.evidence.is_empty());
    assert!(result.answer.is_none());
    assert!(result.diagnostics.generator_invoked);
    assert!(result
        .diagnostics
        .partial_failures
        .iter()
        .any(|f| f.unit == "answer_generator"));
}

#[tokio::test]
async fn failed_seed_tier_is_reported_not_raised() {
    let h = harness();
    h.store.fail_method("find_by_name", "name index offline");

    let result = h
        .orchestrator
        .query("What products does Acme Corp sell?", &acme(), QueryOptions::default())
        .await
        .unwrap();

    assert!(result
        .diagnostics
        .partial_failures
        .iter()
        .any(|f| f.unit == "seed_tier:exact_name"));
    assert_eq!(result.status, QueryStatus::Found);
}

// ---------------------------------------------------------------------------
// Builder and caching
// ---------------------------------------------------------------------------

#[test]
fn builder_requires_store_and_embedder() {
    let missing_store = Orchestrator::builder(StrandConfig::default())
        .embedding_service(Arc::new(HashEmbedder::new()))
        .build();
    assert!(matches!(missing_store, Err(StrandError::ConfigError(_))));

    let missing_embedder = Orchestrator::builder(StrandConfig::default())
        .graph_store(Arc::new(graph_store()))
        .build();
    assert!(matches!(missing_embedder, Err(StrandError::ConfigError(_))));
}

#[test]
fn builder_rejects_invalid_config() {
    let mut config = StrandConfig::default();
    config.drift.confidence_threshold = 1.5;

    let result = Orchestrator::builder(config)
        .graph_store(Arc::new(graph_store()))
        .embedding_service(Arc::new(HashEmbedder::new()))
        .build();

    match result {
        Err(e) => assert_eq!(e.kind(), ErrorKind::Configuration),
        Ok(_) => panic!("invalid config accepted"),
    }
}

#[tokio::test]
async fn index_version_change_invalidates_cached_walks() {
    let h = harness();
    let query = "What products does Acme Corp sell?";

    let first = h
        .orchestrator
        .query(query, &acme(), QueryOptions::default())
        .await
        .unwrap();
    let second = h
        .orchestrator
        .query(query, &acme(), QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(first.diagnostics.cache_hits, 0);
    assert_eq!(second.diagnostics.cache_hits, 1);
    assert_eq!(first.evidence, second.evidence);

    h.store.bump_version(&acme());
    let third = h
        .orchestrator
        .query(query, &acme(), QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(third.diagnostics.cache_hits, 0);
    assert_eq!(third.diagnostics.index_version, Some(IndexVersion(2)));
}
